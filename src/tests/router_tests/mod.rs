mod form_tests;
mod list_tests;
mod mutation_tests;
