/// Entity CRUD and relation tests against a migrated SQLite store
pub mod crud_tests;
