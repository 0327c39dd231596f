//! Telegram route-map bot.
//!
//! A user picks a district, then a route, and gets the route photo with its
//! box and entrance counts. The navigation core ([`navigation::Navigator`])
//! is a pure `(Session, Event) -> (Session, [Outbound])` function; the
//! [`dispatcher::Dispatcher`] wires it to a session store and a message sink
//! such as [`telegram::TelegramClient`].

pub mod assets;
pub mod catalog;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod navigation;
pub mod presentation;
pub mod session;
pub mod telegram;
