// src/entities/catalog.rs
//
// Every entity the dashboard manages, described as data. Adding a table is
// adding an entry here.

use crate::entities::forms::{FieldKind, FormField, FormSpec};
use crate::listview::row::{Column, ColumnKind, ViewSpec};
use crate::listview::sort::SortState;
use crate::listview::source::{InMemoryListSource, ListSource, PagingMode, RemoteListSource};
use crate::listview::status::{ScheduleRule, StatusRule};
use url::form_urlencoded;

#[derive(Debug, Clone, Copy)]
pub struct EntitySpec {
    /// URL segment, e.g. `fitness-events`.
    pub slug: &'static str,
    pub title: &'static str,
    pub singular: &'static str,
    /// REST resource under the API base.
    pub resource: &'static str,
    pub view: ViewSpec,
    pub paging: PagingMode,
    pub default_sort: &'static str,
    pub form: FormSpec,
    /// Boolean field flipped by the status toggle, when the entity has one.
    pub toggle_field: Option<&'static str>,
}

impl EntitySpec {
    pub fn source(&self) -> &'static dyn ListSource {
        match self.paging {
            PagingMode::Client => &InMemoryListSource,
            PagingMode::Server => &RemoteListSource,
        }
    }

    pub fn default_sort(&self) -> SortState {
        SortState::new(self.default_sort, self.view.sort_kind(self.default_sort))
    }

    pub fn list_path(&self) -> String {
        format!("/{}", self.slug)
    }

    /// `/{slug}/{id}` plus an optional action segment, with the id escaped.
    pub fn record_path(&self, id: &str, action: Option<&str>) -> String {
        let id: String = form_urlencoded::byte_serialize(id.as_bytes()).collect();
        match action {
            Some(action) => format!("/{}/{id}/{action}", self.slug),
            None => format!("/{}/{id}", self.slug),
        }
    }
}

pub fn find(slug: &str) -> Option<&'static EntitySpec> {
    CATALOG.iter().find(|e| e.slug == slug)
}

const fn col(key: &'static str, header: &'static str, kind: ColumnKind) -> Column {
    Column {
        key,
        header,
        path: key,
        kind,
    }
}

const fn nested(key: &'static str, header: &'static str, path: &'static str) -> Column {
    Column {
        key,
        header,
        path,
        kind: ColumnKind::Text,
    }
}

const CREATED: Column = col("createdAt", "Created", ColumnKind::Date);

// Events

const EVENT_COLUMNS: &[Column] = &[
    col("title", "Title", ColumnKind::Text),
    nested("location", "Location", "location.city"),
    col("startDate", "Starts", ColumnKind::Date),
    col("endDate", "Ends", ColumnKind::Date),
    col("timing", "Hours", ColumnKind::Text),
    col("price", "Price", ColumnKind::Money),
];

const EVENT_FIELDS: &[FormField] = &[
    FormField::required("title", "Title", FieldKind::Text),
    FormField::optional("description", "Description", FieldKind::TextArea),
    FormField::required("venue", "Venue", FieldKind::Text),
    FormField::required("startDate", "Start date", FieldKind::Date),
    FormField::optional("endDate", "End date", FieldKind::Date),
    FormField::optional("timing", "Hours", FieldKind::TimeWindow),
    FormField::required("price", "Price", FieldKind::Number),
    FormField::optional("bookingUrl", "Booking link", FieldKind::Url),
];

// Fitness

const FITNESS_COLUMNS: &[Column] = &[
    col("name", "Class", ColumnKind::Text),
    nested("activity", "Activity", "activityType.name"),
    nested("trainer", "Trainer", "trainer.name"),
    col("startDate", "Starts", ColumnKind::Date),
    col("endDate", "Ends", ColumnKind::Date),
    col("time", "Time", ColumnKind::Text),
    col("days", "Days", ColumnKind::Text),
    col("price", "Price", ColumnKind::Money),
];

const FITNESS_FIELDS: &[FormField] = &[
    FormField::required("name", "Class name", FieldKind::Text),
    FormField::required("trainerName", "Trainer", FieldKind::Text),
    FormField::required("startDate", "Start date", FieldKind::Date),
    FormField::required("endDate", "End date", FieldKind::Date),
    FormField::required("time", "Time", FieldKind::TimeWindow),
    FormField::optional("days", "Days", FieldKind::Text),
    FormField::required("price", "Price", FieldKind::Number),
    FormField::optional("capacity", "Capacity", FieldKind::Number),
];

// Gyms

const GYM_COLUMNS: &[Column] = &[
    col("name", "Gym", ColumnKind::Text),
    nested("city", "City", "address.city"),
    col("phone", "Phone", ColumnKind::Phone),
    col("openingHours", "Hours", ColumnKind::Text),
    col("monthlyFee", "Monthly", ColumnKind::Money),
    CREATED,
];

const GYM_FIELDS: &[FormField] = &[
    FormField::required("name", "Name", FieldKind::Text),
    FormField::required("phone", "Phone", FieldKind::Phone),
    FormField::optional("email", "Email", FieldKind::Email),
    FormField::optional("openingHours", "Opening hours", FieldKind::TimeWindow),
    FormField::required("monthlyFee", "Monthly fee", FieldKind::Number),
    FormField::optional("website", "Website", FieldKind::Url),
    FormField::optional("isActive", "Active", FieldKind::Checkbox),
];

// Spa

const SPA_COLUMNS: &[Column] = &[
    col("name", "Treatment", ColumnKind::Text),
    col("category", "Category", ColumnKind::Text),
    col("duration", "Minutes", ColumnKind::Number),
    col("price", "Price", ColumnKind::Money),
    CREATED,
];

const SPA_FIELDS: &[FormField] = &[
    FormField::required("name", "Treatment", FieldKind::Text),
    FormField::required(
        "category",
        "Category",
        FieldKind::Select(&["Massage", "Facial", "Body", "Wellness"]),
    ),
    FormField::required("duration", "Duration (minutes)", FieldKind::Number),
    FormField::required("price", "Price", FieldKind::Number),
    FormField::optional("description", "Description", FieldKind::TextArea),
    FormField::optional("isActive", "Active", FieldKind::Checkbox),
];

// Vendors

const VENDOR_COLUMNS: &[Column] = &[
    col("businessName", "Business", ColumnKind::Text),
    col("contactName", "Contact", ColumnKind::Text),
    col("email", "Email", ColumnKind::Email),
    col("phone", "Phone", ColumnKind::Phone),
    col("category", "Category", ColumnKind::Text),
    CREATED,
];

const VENDOR_FIELDS: &[FormField] = &[
    FormField::required("businessName", "Business name", FieldKind::Text),
    FormField::required("contactName", "Contact name", FieldKind::Text),
    FormField::required("email", "Email", FieldKind::Email),
    FormField::required("phone", "Phone", FieldKind::Phone),
    FormField::required(
        "category",
        "Category",
        FieldKind::Select(&["Events", "Fitness", "Gym", "Spa", "Merchandise", "Travel"]),
    ),
    FormField::optional("isActive", "Active", FieldKind::Checkbox),
];

// Visa applications

const VISA_COLUMNS: &[Column] = &[
    col("applicantName", "Applicant", ColumnKind::Text),
    col("email", "Email", ColumnKind::Email),
    col("passportNumber", "Passport", ColumnKind::Text),
    nested("country", "Destination", "country.name"),
    col("travelDate", "Travel date", ColumnKind::Date),
    CREATED,
];

const VISA_FIELDS: &[FormField] = &[
    FormField::required("applicantName", "Applicant", FieldKind::Text),
    FormField::required("email", "Email", FieldKind::Email),
    FormField::required("phone", "Phone", FieldKind::Phone),
    FormField::required("passportNumber", "Passport number", FieldKind::Text),
    FormField::required("travelDate", "Travel date", FieldKind::Date),
    FormField::optional("returnDate", "Return date", FieldKind::Date),
    FormField::required(
        "status",
        "Status",
        FieldKind::Select(&["submitted", "processing", "approved", "rejected"]),
    ),
];

// Podcasts

const PODCAST_COLUMNS: &[Column] = &[
    col("title", "Episode", ColumnKind::Text),
    col("host", "Host", ColumnKind::Text),
    col("duration", "Minutes", ColumnKind::Number),
    col("publishedAt", "Published", ColumnKind::DateTime),
];

const PODCAST_FIELDS: &[FormField] = &[
    FormField::required("title", "Title", FieldKind::Text),
    FormField::required("host", "Host", FieldKind::Text),
    FormField::optional("description", "Description", FieldKind::TextArea),
    FormField::required("audioUrl", "Audio link", FieldKind::Url),
    FormField::optional("duration", "Duration (minutes)", FieldKind::Number),
    FormField::optional("publishedAt", "Publish at", FieldKind::DateTime),
    FormField::optional("isPublished", "Published", FieldKind::Checkbox),
];

// Orders

const ORDER_COLUMNS: &[Column] = &[
    col("orderNumber", "Order", ColumnKind::Text),
    nested("customer", "Customer", "userId.name"),
    nested("customerEmail", "Email", "userId.email"),
    nested("product", "Product", "productId.title"),
    col("quantity", "Qty", ColumnKind::Number),
    col("totalAmount", "Total", ColumnKind::Money),
    CREATED,
];

const ORDER_FIELDS: &[FormField] = &[
    FormField::required(
        "paymentStatus",
        "Payment status",
        FieldKind::Select(&["pending", "paid", "failed", "refunded"]),
    ),
    FormField::optional("trackingNumber", "Tracking number", FieldKind::Text),
    FormField::optional("notes", "Notes", FieldKind::TextArea),
];

// Admin users

const ADMIN_COLUMNS: &[Column] = &[
    col("name", "Name", ColumnKind::Text),
    col("email", "Email", ColumnKind::Email),
    col("phone", "Phone", ColumnKind::Phone),
    col("role", "Role", ColumnKind::Text),
    col("lastLogin", "Last login", ColumnKind::DateTime),
    CREATED,
];

const ADMIN_FIELDS: &[FormField] = &[
    FormField::required("name", "Name", FieldKind::Text),
    FormField::required("email", "Email", FieldKind::Email),
    FormField::optional("phone", "Phone", FieldKind::Phone),
    FormField::required(
        "role",
        "Role",
        FieldKind::Select(&["superadmin", "admin", "editor", "support"]),
    ),
    FormField::optional("isActive", "Active", FieldKind::Checkbox),
];

// Lookups

const ACTIVITY_COLUMNS: &[Column] = &[
    col("name", "Activity", ColumnKind::Text),
    col("description", "Description", ColumnKind::Text),
    CREATED,
];

const ACTIVITY_FIELDS: &[FormField] = &[
    FormField::required("name", "Name", FieldKind::Text),
    FormField::optional("description", "Description", FieldKind::TextArea),
    FormField::optional("isActive", "Active", FieldKind::Checkbox),
];

const COUNTRY_COLUMNS: &[Column] = &[
    col("name", "Country", ColumnKind::Text),
    col("code", "Code", ColumnKind::Text),
    col("visaFee", "Visa fee", ColumnKind::Money),
    col("processingDays", "Processing days", ColumnKind::Number),
];

const COUNTRY_FIELDS: &[FormField] = &[
    FormField::required("name", "Name", FieldKind::Text),
    FormField::required("code", "ISO code", FieldKind::Text),
    FormField::optional("visaFee", "Visa fee", FieldKind::Number),
    FormField::optional("processingDays", "Processing days", FieldKind::Number),
    FormField::optional("isActive", "Active", FieldKind::Checkbox),
];

const ACTIVE_FLAG: StatusRule = StatusRule::Flag { field: "isActive" };

pub static CATALOG: &[EntitySpec] = &[
    EntitySpec {
        slug: "events",
        title: "Events",
        singular: "Event",
        resource: "events",
        view: ViewSpec {
            columns: EVENT_COLUMNS,
            search_fields: &["title", "venue", "location.city", "startDate"],
            digit_fields: &["startDate", "endDate"],
            status: StatusRule::Schedule(ScheduleRule {
                start: "startDate",
                end: Some("endDate"),
                hours: Some("timing"),
                days: None,
            }),
        },
        paging: PagingMode::Client,
        default_sort: "startDate",
        form: FormSpec {
            fields: EVENT_FIELDS,
            date_order: Some(("startDate", "endDate")),
        },
        toggle_field: None,
    },
    EntitySpec {
        slug: "fitness-events",
        title: "Fitness classes",
        singular: "Fitness class",
        resource: "fitness",
        view: ViewSpec {
            columns: FITNESS_COLUMNS,
            search_fields: &["name", "activityType.name", "trainer.name", "trainerName", "days"],
            digit_fields: &["startDate", "endDate"],
            status: StatusRule::Schedule(ScheduleRule {
                start: "startDate",
                end: Some("endDate"),
                hours: Some("time"),
                days: Some("days"),
            }),
        },
        paging: PagingMode::Client,
        default_sort: "startDate",
        form: FormSpec {
            fields: FITNESS_FIELDS,
            date_order: Some(("startDate", "endDate")),
        },
        toggle_field: None,
    },
    EntitySpec {
        slug: "gyms",
        title: "Gyms",
        singular: "Gym",
        resource: "gyms",
        view: ViewSpec {
            columns: GYM_COLUMNS,
            search_fields: &["name", "address.city", "email", "phone"],
            digit_fields: &["phone", "createdAt"],
            status: ACTIVE_FLAG,
        },
        paging: PagingMode::Client,
        default_sort: "name",
        form: FormSpec {
            fields: GYM_FIELDS,
            date_order: None,
        },
        toggle_field: Some("isActive"),
    },
    EntitySpec {
        slug: "spa",
        title: "Spa services",
        singular: "Spa service",
        resource: "spa",
        view: ViewSpec {
            columns: SPA_COLUMNS,
            search_fields: &["name", "category", "description"],
            digit_fields: &[],
            status: ACTIVE_FLAG,
        },
        paging: PagingMode::Client,
        default_sort: "name",
        form: FormSpec {
            fields: SPA_FIELDS,
            date_order: None,
        },
        toggle_field: Some("isActive"),
    },
    EntitySpec {
        slug: "vendors",
        title: "Vendors",
        singular: "Vendor",
        resource: "vendors",
        view: ViewSpec {
            columns: VENDOR_COLUMNS,
            search_fields: &["businessName", "contactName", "email", "category"],
            digit_fields: &["phone"],
            status: ACTIVE_FLAG,
        },
        paging: PagingMode::Client,
        default_sort: "createdAt",
        form: FormSpec {
            fields: VENDOR_FIELDS,
            date_order: None,
        },
        toggle_field: Some("isActive"),
    },
    EntitySpec {
        slug: "visa-applications",
        title: "Visa applications",
        singular: "Visa application",
        resource: "visa/applications",
        view: ViewSpec {
            columns: VISA_COLUMNS,
            search_fields: &["applicantName", "email", "passportNumber", "country.name"],
            digit_fields: &["phone", "travelDate"],
            status: StatusRule::Application { field: "status" },
        },
        paging: PagingMode::Server,
        default_sort: "createdAt",
        form: FormSpec {
            fields: VISA_FIELDS,
            date_order: Some(("travelDate", "returnDate")),
        },
        toggle_field: None,
    },
    EntitySpec {
        slug: "podcasts",
        title: "Podcasts",
        singular: "Podcast episode",
        resource: "podcasts",
        view: ViewSpec {
            columns: PODCAST_COLUMNS,
            search_fields: &["title", "host", "description"],
            digit_fields: &["publishedAt"],
            status: StatusRule::Flag {
                field: "isPublished",
            },
        },
        paging: PagingMode::Server,
        default_sort: "publishedAt",
        form: FormSpec {
            fields: PODCAST_FIELDS,
            date_order: None,
        },
        toggle_field: Some("isPublished"),
    },
    EntitySpec {
        slug: "orders",
        title: "Orders",
        singular: "Order",
        resource: "orders",
        view: ViewSpec {
            columns: ORDER_COLUMNS,
            search_fields: &["orderNumber", "userId.name", "userId.email", "productId.title"],
            digit_fields: &["createdAt", "userId.phone"],
            status: StatusRule::Payment {
                field: "paymentStatus",
            },
        },
        paging: PagingMode::Server,
        default_sort: "createdAt",
        form: FormSpec {
            fields: ORDER_FIELDS,
            date_order: None,
        },
        toggle_field: None,
    },
    EntitySpec {
        slug: "admin-users",
        title: "Admin users",
        singular: "Admin user",
        resource: "admin/users",
        view: ViewSpec {
            columns: ADMIN_COLUMNS,
            search_fields: &["name", "email", "role"],
            digit_fields: &["phone"],
            status: ACTIVE_FLAG,
        },
        paging: PagingMode::Client,
        default_sort: "name",
        form: FormSpec {
            fields: ADMIN_FIELDS,
            date_order: None,
        },
        toggle_field: Some("isActive"),
    },
    EntitySpec {
        slug: "activity-types",
        title: "Activity types",
        singular: "Activity type",
        resource: "activity-types",
        view: ViewSpec {
            columns: ACTIVITY_COLUMNS,
            search_fields: &["name", "description"],
            digit_fields: &[],
            status: ACTIVE_FLAG,
        },
        paging: PagingMode::Client,
        default_sort: "name",
        form: FormSpec {
            fields: ACTIVITY_FIELDS,
            date_order: None,
        },
        toggle_field: Some("isActive"),
    },
    EntitySpec {
        slug: "countries",
        title: "Countries",
        singular: "Country",
        resource: "countries",
        view: ViewSpec {
            columns: COUNTRY_COLUMNS,
            search_fields: &["name", "code"],
            digit_fields: &[],
            status: ACTIVE_FLAG,
        },
        paging: PagingMode::Client,
        default_sort: "name",
        form: FormSpec {
            fields: COUNTRY_FIELDS,
            date_order: None,
        },
        toggle_field: Some("isActive"),
    },
];
