/// Unit test suite for the public library surface
mod basic_tests;
mod streak_properties;
