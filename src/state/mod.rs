/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures and worker events (data.rs)
/// - The presentation controller state machine (controller.rs)

pub mod controller;
pub mod data;
