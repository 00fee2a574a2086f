//! Integration tests for lazy imports
//!
//! Loaders here count their invocations so each test can tell exactly when
//! a module was built.

use serial_test::serial;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::time::Duration;
use stdl::Error;
use stdl::lazy::{self, Importer, LazyImport, Module, Namespace};
use stdl::log::{LogConfig, subscriber};

type JoinFn = fn(&str, &str) -> String;

fn join(a: &str, b: &str) -> String {
    format!("{}/{}", a.trim_end_matches('/'), b)
}

fn abspath(p: &str) -> String {
    if p.starts_with('/') {
        p.to_string()
    } else {
        format!("/work/{}", p)
    }
}

/// Importer with an `os.path` module whose loader counts calls.
fn os_path_importer() -> (Importer, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let c = calls.clone();
    let importer = Importer::new();
    importer.register("os.path", move || {
        c.fetch_add(1, Ordering::SeqCst);
        Ok(Module::new("os.path")
            .with_attr("join", join as JoinFn)
            .with_attr("abspath", abspath as fn(&str) -> String)
            .with_attr("sep", "/".to_string()))
    });
    (importer, calls)
}

#[derive(Clone, Default)]
struct Buffer(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a thread-local subscriber and return what it logged.
fn capture_logs(f: impl FnOnce()) -> String {
    let buffer = Buffer::default();
    let writer = buffer.clone();
    let config = LogConfig {
        level: Some("info".to_string()),
        colors: false,
        ..Default::default()
    };
    let sub = subscriber(&config, move || writer.clone()).unwrap();
    tracing::subscriber::with_default(sub, f);
    let bytes = buffer.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}

/// Run `f` on its own thread, failing instead of hanging if it blocks.
fn within_timeout<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let _ = tx.send(f());
    });
    rx.recv_timeout(Duration::from_secs(5)).expect("call blocked")
}

// =============================================================================
// Deferred loading
// =============================================================================

#[test]
fn test_names_bound_but_not_loaded() {
    let (importer, calls) = os_path_importer();
    let mut ns = Namespace::new(importer.clone());

    let bound = ns
        .import_lazy("os.path", Some(&["join", "abspath"]), None, true)
        .unwrap();
    assert_eq!(bound, vec!["join", "abspath"]);
    assert!(!importer.is_loaded("os.path"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let join: JoinFn = ns.value("join").unwrap();
    assert_eq!(join("a", "b"), "a/b");
    assert!(importer.is_loaded("os.path"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let timings = importer.timings();
    assert_eq!(timings.len(), 1);
    assert_eq!(timings[0].target, "os.path.join");
    assert!(timings[0].message().starts_with("importing \"os.path.join\" took "));

    // Module is already loaded, so the second name is silent.
    let abspath: fn(&str) -> String = ns.value("abspath").unwrap();
    assert_eq!(abspath("x"), "/work/x");
    assert_eq!(importer.timings().len(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_verbose_import_logs_one_event() {
    let (importer, _) = os_path_importer();
    let mut ns = Namespace::new(importer);
    ns.import_lazy("os.path", Some(&["join", "abspath"]), None, true)
        .unwrap();

    let logs = capture_logs(|| {
        let join: JoinFn = ns.value("join").unwrap();
        assert_eq!(join("a", "b"), "a/b");
        let abspath: fn(&str) -> String = ns.value("abspath").unwrap();
        assert_eq!(abspath("/x"), "/x");
    });

    let events: Vec<&str> = logs
        .lines()
        .filter(|l| l.contains("importing \"os.path"))
        .collect();
    assert_eq!(events.len(), 1, "{}", logs);
    assert!(events[0].contains("[ INFO  ]"));
    assert!(events[0].contains("importing \"os.path.join\" took "));
}

#[test]
fn test_unknown_module_fails_only_on_access() {
    let mut ns = Namespace::new(Importer::new());
    ns.import_lazy("no.such.module", None, None, false).unwrap();
    assert!(ns.contains("module"));

    let err = ns.get("module").unwrap_err();
    assert!(err.is_import_error());
    assert!(err.to_string().contains("no.such.module"));
}

#[test]
fn test_missing_attribute_fails_only_on_access() {
    let (importer, _) = os_path_importer();
    let mut ns = Namespace::new(importer);
    ns.import_lazy("os.path", Some(&["splitext"]), None, false)
        .unwrap();

    let err = ns.get("splitext").unwrap_err();
    assert!(matches!(err, Error::MissingAttribute { .. }));
}

// =============================================================================
// Rebinding and identity
// =============================================================================

#[test]
fn test_rebinding_alias_never_loads_first_target() {
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    let importer = Importer::new();
    let f = first.clone();
    importer.register("json", move || {
        f.fetch_add(1, Ordering::SeqCst);
        Ok(Module::new("json").with_attr("kind", "json".to_string()))
    });
    let s = second.clone();
    importer.register("yaml", move || {
        s.fetch_add(1, Ordering::SeqCst);
        Ok(Module::new("yaml").with_attr("kind", "yaml".to_string()))
    });

    let mut ns = Namespace::new(importer);
    ns.import_lazy("json", None, Some("fmt"), false).unwrap();
    ns.import_lazy("yaml", None, Some("fmt"), false).unwrap();
    assert_eq!(ns.len(), 1);

    let kind: String = ns.attr_value("fmt", "kind").unwrap();
    assert_eq!(kind, "yaml");
    assert_eq!(first.load(Ordering::SeqCst), 0);
    assert_eq!(second.load(Ordering::SeqCst), 1);
}

#[test]
fn test_resolved_module_is_the_imported_module() {
    let (importer, _) = os_path_importer();
    let handle = LazyImport::new(importer.clone(), "os.path", None, false);

    let resolved = handle.get().unwrap();
    let direct = importer.import("os.path").unwrap();
    assert!(Arc::ptr_eq(resolved.as_module().unwrap(), &direct));

    let attr_handle = LazyImport::new(importer, "os.path", Some("sep"), false);
    let via_handle = attr_handle.get().unwrap();
    let via_module = direct.attr("sep").unwrap();
    assert!(via_handle.as_value().unwrap().ptr_eq(&via_module));
}

// =============================================================================
// Failure and retry
// =============================================================================

#[test]
fn test_failed_import_is_retried_on_next_access() {
    let calls = Arc::new(AtomicUsize::new(0));
    let c = calls.clone();
    let importer = Importer::new();
    importer.register("net.remote", move || {
        if c.fetch_add(1, Ordering::SeqCst) < 2 {
            anyhow::bail!("backend unavailable");
        }
        Ok(Module::new("net.remote").with_attr("port", 8080u16))
    });

    let mut ns = Namespace::new(importer.clone());
    ns.import_lazy("net.remote", Some(&["port"]), None, true)
        .unwrap();

    for _ in 0..2 {
        let err = ns.value::<u16>("port").unwrap_err();
        assert!(matches!(err, Error::ImportFrom { .. }));
        assert!(err.to_string().contains("backend unavailable"));
    }
    assert!(importer.timings().is_empty());

    assert_eq!(ns.value::<u16>("port").unwrap(), 8080);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(importer.timings().len(), 1);
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_first_use_across_handles() {
    let (importer, calls) = os_path_importer();
    let handles: Vec<Arc<LazyImport>> = (0..4)
        .map(|_| Arc::new(LazyImport::new(importer.clone(), "os.path", Some("join"), false)))
        .collect();

    let threads: Vec<_> = handles
        .iter()
        .flat_map(|h| std::iter::repeat_n(h.clone(), 4))
        .map(|h| std::thread::spawn(move || h.value::<JoinFn>().unwrap()("x", "y")))
        .collect();

    for t in threads {
        assert_eq!(t.join().unwrap(), "x/y");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

// =============================================================================
// Circular imports
// =============================================================================

#[test]
fn test_mutually_recursive_loaders_fail() {
    let importer = Importer::new();
    let for_a = importer.clone();
    importer.register("pkg.a", move || {
        let b = for_a.import("pkg.b")?;
        Ok(Module::new("pkg.a").with_attr("b", b.name().to_string()))
    });
    let for_b = importer.clone();
    importer.register("pkg.b", move || {
        for_b.import("pkg.a")?;
        Ok(Module::new("pkg.b"))
    });

    let mut ns = Namespace::new(importer.clone());
    ns.import_lazy("pkg.a", None, Some("a"), false).unwrap();
    let err = within_timeout(move || ns.get("a").map(|_| ())).unwrap_err();
    assert!(err.is_import_error());
    assert_eq!(err.to_string(), "cannot import module 'pkg.a': circular import");

    // Nothing is left half loaded, so a fixed loader succeeds.
    importer.register("pkg.b", || Ok(Module::new("pkg.b")));
    let a = importer.import("pkg.a").unwrap();
    assert_eq!(a.attr("b").unwrap().downcast_ref::<String>().unwrap(), "pkg.b");
}

// =============================================================================
// Process-wide namespace
// =============================================================================

#[test]
#[serial]
fn test_global_namespace_with_builtins() {
    lazy::import_lazy("stdl.st", Some(&["snake_case"]), None, false).unwrap();
    lazy::import_lazy("stdl.path", None, Some("p"), false).unwrap();

    let snake: fn(&str) -> String = lazy::value("snake_case").unwrap();
    assert_eq!(snake("HelloWorld"), "hello_world");

    let basename: fn(&str) -> String = lazy::attr_value("p", "basename").unwrap();
    assert_eq!(basename("/a/b/c.txt"), "c.txt");
    assert!(lazy::global_importer().is_loaded("stdl.path"));
}

#[test]
#[serial]
fn test_global_namespace_unbound_name() {
    let err = lazy::value::<String>("never_bound_anywhere").unwrap_err();
    assert!(matches!(err, Error::NameNotBound(_)));
}

#[test]
#[serial]
fn test_loader_touching_global_namespace_does_not_block() {
    lazy::global_importer().register("test.reentrant", || {
        lazy::value::<String>("anything")?;
        Ok(Module::new("test.reentrant"))
    });

    let err = within_timeout(|| {
        lazy::with_namespace(|ns| {
            ns.import_lazy("test.reentrant", None, Some("reentrant"), false)
                .unwrap();
            ns.get("reentrant").map(|_| ())
        })
        .unwrap()
    })
    .unwrap_err();
    assert!(err.to_string().contains("already in use"), "{}", err);

    // Resolving outside the closure reaches the loader without the lock held.
    let err = within_timeout(|| lazy::value::<String>("reentrant")).unwrap_err();
    assert!(matches!(err, Error::Import { .. }));
    assert!(err.to_string().contains("name 'anything' is not bound"), "{}", err);
}
