pub mod mock_varied;
pub mod rule_based;
