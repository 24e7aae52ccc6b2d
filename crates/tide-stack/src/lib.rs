//! tide-stack — service stacks, strategy application and synthesis.
//!
//! A [`ServiceStack`] owns one [`FargateService`] model. Building the stack
//! applies its optional scaling strategy to that service; rendering it
//! produces a CloudFormation-shaped template of what was registered.
//!
//! # Flow
//!
//! ```text
//! tide.toml ──► TideConfig ──► App
//!                               ├── ServiceStack ──► FargateService ◄── Strategy::apply
//!                               └── synth(out_dir) ──► <stack>.template.json, manifest.json
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod service;
pub mod stack;
pub mod template;

pub use app::App;
pub use config::{ScalingConfig, StackConfig, TideConfig};
pub use error::{StackError, StackResult};
pub use service::{FargateService, FargateServiceProps, ScalableTargetModel};
pub use stack::{ServiceStack, ServiceStackProps};
