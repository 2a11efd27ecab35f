/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Routing tables.
//!
//! [`Fib`] routes subscriptions and upstream publications toward the rendezvous
//! point by longest exact prefix. [`St`] routes publications coming back from the
//! rendezvous point to every subscriber whose pattern matches.
//!
//! ```
//! use copss_router::cd::Cd;
//! use copss_router::routing::{Fib, St};
//!
//! let mut fib = Fib::new();
//! fib.add("/news", 3, 1).unwrap();
//!
//! let mut st = St::new(None);
//! let (forward, cd) = st.add("/news(/sports)/today".parse().unwrap(), 7);
//! assert!(forward);
//! assert_eq!(fib.matches(&cd).into_iter().collect::<Vec<_>>(), vec![3]);
//!
//! let published: Cd = "/news/sports/today".parse().unwrap();
//! assert!(st.matches(&published).contains(&7));
//! ```

mod fib;
mod st;
pub mod wildcard;

pub use fib::{Fib, FibEntry};
pub use st::{St, MAX_LIFETIME as MAX_ST_LIFETIME};
