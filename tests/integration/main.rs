//! Integration tests for prize-savings

mod config_test;
mod multicall_test;
mod odds_test;
mod subgraph_test;
