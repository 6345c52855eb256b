// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

mod auth;
mod lifecycle;
mod recording;
mod retention;
