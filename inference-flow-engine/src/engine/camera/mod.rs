//! Viewer camera: free flight, spring fly-to, and the scripted tour.

/// Dual-mode camera with manual 6DOF flight and spring-damped fly-to.
pub mod flight_camera;

/// Scripted looping camera flight over the stage regions.
pub mod tour_director;
