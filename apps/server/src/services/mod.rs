// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Storage services for projects and elements.

pub mod memory;
pub mod postgres;
pub mod store;

pub use store::BimStore;
