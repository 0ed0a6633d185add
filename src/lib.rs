//! rescue-router core
//!
//! Clusters incident reports around depots, routes each cluster through an
//! external OSRM service and summarizes the resulting round trips.

pub mod animation;
pub mod clustering;
pub mod config;
pub mod error;
pub mod haversine;
pub mod model;
pub mod nearest;
pub mod osrm;
pub mod osrm_data;
pub mod polyline;
pub mod router;
pub mod summary;
pub mod traits;
