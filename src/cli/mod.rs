pub mod orchestration;

pub use orchestration::{
    compute_next_version, run_release_workflow, NextVersion, ReleaseWorkflowArgs, WorkflowResult,
};
