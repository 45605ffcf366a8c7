//! Client-side state engine for the fahrplan post scheduler: the local view
//! of scheduled posts, its reconciliation against the remote backend, and
//! the remote-or-local routing of the AI-assisted helpers.

pub mod engine;
