// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod activity;
pub mod favorite;
pub mod token;
pub mod user;

pub use activity::{ActivityItem, AnnotatedItem, CreatedUser};
pub use favorite::Favorite;
pub use token::AuthToken;
pub use user::User;
