//! Test suite for the orchestration entry point

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use stagehand::component::GroupComponents;
use stagehand::volume::{Log, Logs, LogsSpec};
use stagehand::{
    CancellationToken, ClusterConfig, ClusterOptions, Component, ComponentGroups, ComponentPatch,
    ComponentRuntime, ExtraArg, OrchestrationError, Orchestrator, ResourceSet, StagehandError,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Records every call instead of launching processes
#[derive(Default)]
struct RecordingRuntime {
    calls: Mutex<Vec<String>>,
    fail_on: Option<&'static str>,
}

impl RecordingRuntime {
    fn failing_on(name: &'static str) -> Self {
        Self {
            fail_on: Some(name),
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ComponentRuntime for RecordingRuntime {
    type Error = anyhow::Error;

    async fn start(&self, component: Component, _cancel: CancellationToken) -> anyhow::Result<()> {
        let call = format!("start {} {}", component.name, component.args.join(" "));
        self.calls.lock().unwrap().push(call.trim_end().to_string());
        if self.fail_on == Some(component.name.as_str()) {
            anyhow::bail!("{} exited with status 1", component.name);
        }
        Ok(())
    }

    async fn stop(&self, component: Component, _cancel: CancellationToken) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(format!("stop {}", component.name));
        Ok(())
    }
}

fn cluster() -> ClusterConfig {
    ClusterConfig::new(vec![
        Component::new("kube-scheduler").with_link("kube-apiserver"),
        Component::new("kube-apiserver")
            .with_link("etcd")
            .with_args(["--etcd-servers=http://localhost:2379"]),
        Component::new("etcd"),
    ])
    .with_patch(
        ComponentPatch::new("kube-apiserver")
            .with_arg(ExtraArg::replace("etcd-servers", "http://192.168.66.2:3379")),
    )
}

#[tokio::test]
async fn test_up_starts_in_dependency_order_with_patches() {
    let orchestrator = Orchestrator::new(cluster()).unwrap();
    let runtime = RecordingRuntime::default();

    orchestrator.up(&runtime).await.unwrap();

    assert_eq!(
        runtime.calls(),
        vec![
            "start etcd",
            "start kube-apiserver --etcd-servers=http://192.168.66.2:3379",
            "start kube-scheduler",
        ]
    );
}

#[tokio::test]
async fn test_down_stops_in_reverse_order() {
    let orchestrator = Orchestrator::new(cluster()).unwrap();
    let runtime = RecordingRuntime::default();

    orchestrator.down(&runtime).await.unwrap();

    assert_eq!(
        runtime.calls(),
        vec!["stop kube-scheduler", "stop kube-apiserver", "stop etcd"]
    );
}

#[tokio::test]
async fn test_up_stops_at_failing_component() {
    let orchestrator = Orchestrator::new(cluster()).unwrap();
    let runtime = RecordingRuntime::failing_on("kube-apiserver");

    let err = orchestrator.up(&runtime).await.unwrap_err();

    match err {
        OrchestrationError::Action(err) => {
            assert_eq!(err.to_string(), "kube-apiserver exited with status 1");
        }
        other => panic!("Expected action error, got {other:?}"),
    }
    assert_eq!(runtime.calls().len(), 2);
}

#[tokio::test]
async fn test_dependency_error_before_any_action() {
    let config = ClusterConfig::new(vec![
        Component::new("a").with_link("b"),
        Component::new("b").with_link("a"),
    ]);
    let orchestrator = Orchestrator::new(config).unwrap();
    let invoked = AtomicUsize::new(0);

    let result = orchestrator
        .for_each_component(false, true, |_component, _cancel| {
            let invoked = &invoked;
            async move {
                invoked.fetch_add(1, Ordering::SeqCst);
                Ok::<(), String>(())
            }
        })
        .await;

    assert!(matches!(
        result,
        Err(OrchestrationError::Dependency(StagehandError::Dependency { .. }))
    ));
    assert_eq!(invoked.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_dry_run_comes_from_config() {
    let config = cluster().with_options(ClusterOptions::builder().dry_run(true).build());
    let orchestrator = Orchestrator::new(config).unwrap();
    assert!(orchestrator.is_dry_run());

    let running = AtomicUsize::new(0);
    let invoked = Mutex::new(Vec::new());
    orchestrator
        .for_each_component(false, false, |component, _cancel| {
            let running = &running;
            let invoked = &invoked;
            async move {
                assert_eq!(running.fetch_add(1, Ordering::SeqCst), 0);
                tokio::task::yield_now().await;
                invoked.lock().unwrap().push(component.name);
                running.fetch_sub(1, Ordering::SeqCst);
                Ok::<(), String>(())
            }
        })
        .await
        .unwrap();

    assert_eq!(
        invoked.into_inner().unwrap(),
        vec!["etcd", "kube-apiserver", "kube-scheduler"]
    );
}

#[tokio::test]
async fn test_custom_grouper() {
    struct SingleGroup;

    impl GroupComponents for SingleGroup {
        fn group(&self, components: &[Component]) -> stagehand::Result<ComponentGroups> {
            Ok(vec![components.to_vec()])
        }
    }

    let orchestrator = Orchestrator::with_grouper(cluster(), SingleGroup).unwrap();
    let groups = orchestrator.groups().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 3);
}

#[test]
fn test_log_volumes_from_config() {
    let resources = ResourceSet {
        logs: vec![Logs {
            name: "fake-pod".into(),
            spec: LogsSpec {
                logs: vec![
                    Log {
                        containers: vec!["app".into()],
                        logs_file: PathBuf::from("/var/log/fake/app.log"),
                        follow: true,
                    },
                    Log {
                        containers: vec!["sidecar".into()],
                        logs_file: PathBuf::from("/var/log/fake/sidecar.log"),
                        follow: false,
                    },
                ],
            },
        }],
        ..Default::default()
    };
    let orchestrator = Orchestrator::new(cluster().with_resources(resources)).unwrap();

    let volumes = orchestrator.log_volumes();

    assert_eq!(volumes.len(), 1);
    assert_eq!(volumes[0].name, "log-volume-0");
    assert_eq!(volumes[0].host_path, PathBuf::from("/var/log/fake"));
}
