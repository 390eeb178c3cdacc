pub mod handlers;
pub mod middleware;
pub mod routing;
pub mod startup;
pub mod state;
pub mod types;
