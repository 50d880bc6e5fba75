//! Tests for registering transforms on a live pipeline.

use std::sync::Once;
use std::thread;

use normail::{Address, LocalFn, Pipeline, Transforms, delete_dots};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

fn suffix(text: &'static str) -> impl Fn(&mut Address) + Send + Sync + 'static {
    move |address: &mut Address| address.local.push_str(text)
}

#[test]
fn test_registration_appends_in_order() {
    init_tracing();
    let pipeline = Pipeline::builder()
        .domain_fn(normail::lowercase)
        .override_for(
            "Example.com",
            Transforms::new().with(suffix("-f")).with(suffix("-g")),
        )
        .build()
        .unwrap();

    pipeline.register_local_transforms("EXAMPLE.COM", Transforms::new().with(suffix("-h")));
    assert_eq!(pipeline.normalize("x@example.com"), "x-f-g-h@example.com");
}

#[test]
fn test_gmail_pipeline_can_be_extended() {
    init_tracing();
    let pipeline = Pipeline::gmail();
    pipeline
        .register_local_transforms("GMAIL.com", Transforms::new().with(suffix("!")))
        .register_local_transforms("Outlook.com", Transforms::new().with(LocalFn(delete_dots)));

    assert_eq!(pipeline.normalize("A.B+c@gmail.com"), "ab!@gmail.com");
    assert_eq!(pipeline.normalize("A.B+c@googlemail.com"), "ab!@gmail.com");
    assert_eq!(pipeline.normalize("A.B+c@outlook.com"), "ab+c@outlook.com");

    // The shared default is untouched.
    assert_eq!(normail::normalize("A.B+c@gmail.com"), "ab@gmail.com");
    assert_eq!(normail::normalize("A.B+c@outlook.com"), "a.b+c@outlook.com");
}

#[test]
fn test_concurrent_readers_see_whole_registrations() {
    init_tracing();
    let pipeline = Pipeline::builder().domain_fn(normail::lowercase).build().unwrap();

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..500 {
                    let got = pipeline.normalize("x@example.com");
                    // Each registration adds "ab" as one unit.
                    let tail = got
                        .strip_prefix('x')
                        .and_then(|rest| rest.strip_suffix("@example.com"))
                        .unwrap();
                    assert_eq!(tail.len() % 2, 0, "partial registration observed: {got}");
                    assert!(tail.chars().collect::<Vec<_>>().chunks(2).all(|c| c == ['a', 'b']));
                }
            });
        }

        scope.spawn(|| {
            for _ in 0..50 {
                pipeline.register_local_transforms(
                    "Example.com",
                    Transforms::new().with(suffix("a")).with(suffix("b")),
                );
            }
        });
    });

    let expected = format!("x{}@example.com", "ab".repeat(50));
    assert_eq!(pipeline.normalize("x@example.com"), expected);
}
