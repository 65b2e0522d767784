//! heliox — terminal and embedded-web client for the Heliox GPU spend
//! analytics backend.

pub mod access;
pub mod analytics;
pub mod api;
pub mod charts;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod health;
pub mod recommendations;
pub mod resource;
pub mod waitlist;
pub mod web;
