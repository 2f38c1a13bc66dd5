//! Container environment detection.
//!
//! Feeds the `virtualization_role` / `virtualization_system` host tags.

use std::env;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

/// Virtualization facts about the current host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Virtualization {
    /// `"guest"` inside a container, empty on bare metal.
    pub role: &'static str,
    /// Container runtime name, empty when unknown.
    pub system: &'static str,
}

/// Cached result of container detection.
static VIRTUALIZATION: LazyLock<Virtualization> = LazyLock::new(detect);

/// Returns the detected virtualization facts. The result is cached after the first call.
pub fn virtualization() -> Virtualization {
    *VIRTUALIZATION
}

fn detect() -> Virtualization {
    let system = if check_k8s() {
        Some("kubernetes")
    } else if Path::new("/.dockerenv").exists() {
        Some("docker")
    } else if Path::new("/run/.containerenv").exists() {
        Some("podman")
    } else {
        check_cgroup()
    };

    match system {
        Some(system) => Virtualization {
            role: "guest",
            system,
        },
        None => Virtualization {
            role: "",
            system: "",
        },
    }
}

/// Kubernetes injects these into all pods.
fn check_k8s() -> bool {
    env::var("KUBERNETES_SERVICE_HOST").is_ok()
        || Path::new("/var/run/secrets/kubernetes.io/serviceaccount/token").exists()
}

fn check_cgroup() -> Option<&'static str> {
    let content = fs::read_to_string("/proc/1/cgroup").ok()?;
    cgroup_runtime(&content)
}

/// Maps cgroup path markers of PID 1 to a runtime name.
fn cgroup_runtime(content: &str) -> Option<&'static str> {
    let patterns = [
        ("kubepods", "kubernetes"),
        ("docker", "docker"),
        ("containerd", "containerd"),
        ("lxc", "lxc"),
    ];
    patterns
        .iter()
        .find(|(marker, _)| content.contains(marker))
        .map(|(_, runtime)| *runtime)
}
