pub mod analyze_portfolio;
pub mod news_service;
pub mod parse_holdings;
