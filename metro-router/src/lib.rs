//! Metro route planner server.
//!
//! Loads a metro network (stations, timed connections, lines) and answers
//! two questions over HTTP: "what is the fastest way from here to there?"
//! and "what is the fastest loop from here through all of these stations?"

pub mod domain;
pub mod network;
pub mod planner;
pub mod web;
