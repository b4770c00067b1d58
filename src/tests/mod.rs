mod fixtures;
mod will_ownership_tests;
mod storage_tests;
mod config_tests;
