#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfmerge::{JobRunner, MergeRequest, UploadedFile};
use std::sync::OnceLock;
use tokio::runtime::{Builder, Runtime};

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

fn runtime() -> &'static Runtime {
    RUNTIME.get_or_init(|| Builder::new_current_thread().enable_all().build().unwrap())
}

fuzz_target!(|data: &[u8]| {
    // First byte picks the split point between the two uploads.
    let Some((&split, rest)) = data.split_first() else {
        return;
    };
    let split = usize::from(split).min(rest.len());
    let (first, second) = rest.split_at(split);

    let request = MergeRequest::new(vec![
        UploadedFile::new("first.pdf", first.to_vec()),
        UploadedFile::new("second.pdf", second.to_vec()),
    ]);

    // Any outcome is fine as long as it is a value, not a panic.
    let _ = runtime().block_on(JobRunner::default().run_job(request));
});
