pub mod investment_service;
pub mod maturity_sweep;
