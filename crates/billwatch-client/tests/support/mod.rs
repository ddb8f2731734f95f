pub mod detect_testkit;
