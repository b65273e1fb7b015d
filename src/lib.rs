//! Sentence-by-sentence subtitle player core.
//!
//! [`formats::srt::parse_srt`] turns SubRip text into [`model::Cue`]s and a
//! [`controller::Controller`] steps through them, driving any
//! [`media::MediaSurface`] and saving its state to any [`store::StateStore`].

pub mod app;
pub mod cli;
pub mod command;
pub mod config;
pub mod controller;
pub mod formats;
pub mod media;
pub mod model;
pub mod session;
pub mod source;
pub mod store;
pub mod view;
