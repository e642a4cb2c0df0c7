//
//  azure-devops-rest
//  api/areas/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Endpoint catalogs, one module per resource family.
//!
//! Each family is a small struct borrowing the [`DevOpsClient`](super::DevOpsClient)
//! and is reached through an accessor such as `client.build()`. Catalog
//! methods only assemble an [`Operation`](super::Operation) and hand it to the
//! dispatcher; they never touch HTTP themselves.
//!
//! | Module | Accessor | Routes under |
//! |--------|----------|--------------|
//! | [`build`] | `build()` | `{project}/_apis/build` |
//! | [`pipelines`] | `pipelines()` | `{project}/_apis/pipelines` |
//! | [`task_agent`] | `task_agent()` | `_apis/distributedtask` |
//! | [`test`] | `test()` | `{project}/_apis/test` |
//! | [`test_plan`] | `test_plan()` | `{project}/_apis/testplan` |
//! | [`work`] | `work()` | `{project}/{team}/_apis/work` |

pub mod build;
pub mod pipelines;
pub mod task_agent;
pub mod test;
pub mod test_plan;
pub mod work;

pub use build::*;
pub use pipelines::*;
pub use task_agent::*;
pub use test::*;
pub use test_plan::*;
pub use work::*;
