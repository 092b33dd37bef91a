pub mod application;
pub mod assessment;
pub mod history;
pub mod prediction;
