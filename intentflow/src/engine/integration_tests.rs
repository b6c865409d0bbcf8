//! End-to-end tests for request processing.

#[cfg(test)]
mod tests {
    use crate::approval::{Confirmer, MockConfirmer};
    use crate::planner::Plan;
    use async_trait::async_trait;
    use crate::cancellation::CancellationToken;
    use crate::config::EngineConfig;
    use crate::context::{RunContext, PRIMARY_MEDIA_PATH};
    use crate::engine::{ConfirmationPolicy, IntentEngine, RequestOutcome};
    use crate::errors::IntentflowError;
    use crate::events::CollectingEventSink;
    use crate::executor::WorkflowExecutor;
    use crate::testing::{recording_registry, FailingTool, RecordingTool, SlowTool, ToolHandles};
    use crate::tools::{builtin_registry, ids, ToolRegistry};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::time::Duration;

    fn engine_over(registry: ToolRegistry) -> IntentEngine {
        IntentEngine::new(
            WorkflowExecutor::new(Arc::new(registry)).with_step_pause(Duration::ZERO),
        )
    }

    fn recording_engine() -> (IntentEngine, ToolHandles) {
        let (registry, handles) = recording_registry();
        (engine_over(registry), handles)
    }

    /// Approves after `delay`, or never answers when `delay` is `None`.
    struct SlowConfirmer {
        delay: Option<Duration>,
    }

    #[async_trait]
    impl Confirmer for SlowConfirmer {
        async fn confirm(&self, _plan: &Plan) -> bool {
            match self.delay {
                Some(delay) => {
                    tokio::time::sleep(delay).await;
                    true
                }
                None => std::future::pending().await,
            }
        }
    }

    fn declining() -> Arc<dyn Confirmer> {
        let mut mock = MockConfirmer::new();
        mock.expect_confirm().times(1).returning(|_| false);
        Arc::new(mock)
    }

    #[tokio::test]
    async fn test_unplannable_request_runs_nothing() {
        let (engine, handles) = recording_engine();
        let mut confirmer = MockConfirmer::new();
        confirmer.expect_confirm().never();
        let engine = engine.with_confirmer(Arc::new(confirmer));

        let err = engine
            .process_batch(&RunContext::new(), "帮我处理一下视频")
            .await
            .unwrap_err();

        assert!(matches!(err, IntentflowError::Unplannable));
        assert!(handles.values().all(|tool| tool.call_count() == 0));
    }

    #[tokio::test]
    async fn test_declined_plan_is_not_an_error() {
        let (engine, handles) = recording_engine();
        let engine = engine.with_confirmer(declining());
        let sink = Arc::new(CollectingEventSink::new());
        let ctx = RunContext::new().with_event_sink(sink.clone());

        let outcome = engine
            .process_batch(&ctx, "下载视频 https://a.com/v.mp4")
            .await
            .unwrap();

        assert_eq!(outcome, RequestOutcome::Declined);
        assert_eq!(handles[ids::DOWNLOADER].call_count(), 0);
        assert_eq!(sink.event_types(), vec!["workflow.planned", "workflow.declined"]);
    }

    #[tokio::test]
    async fn test_approved_plan_runs() {
        let (engine, handles) = recording_engine();
        let mut confirmer = MockConfirmer::new();
        confirmer
            .expect_confirm()
            .withf(|plan| plan.len() == 1)
            .times(1)
            .returning(|_| true);
        let engine = engine.with_confirmer(Arc::new(confirmer));

        let outcome = engine
            .process(
                &RunContext::new(),
                "下载视频 https://a.com/v.mp4",
                ConfirmationPolicy::Required,
            )
            .await
            .unwrap();

        assert_eq!(outcome, RequestOutcome::Completed { steps: 1 });
        assert_eq!(handles[ids::DOWNLOADER].inputs(), vec!["https://a.com/v.mp4"]);
    }

    #[tokio::test]
    async fn test_interactive_skips_confirmer() {
        let (engine, handles) = recording_engine();
        let mut confirmer = MockConfirmer::new();
        confirmer.expect_confirm().never();
        let engine = engine.with_confirmer(Arc::new(confirmer));

        engine
            .process_interactive(&RunContext::new(), "translate https://a.com/v.mp4")
            .await
            .unwrap();

        assert_eq!(handles[ids::TRANSLATOR].call_count(), 1);
    }

    #[tokio::test]
    async fn test_downloaded_path_flows_to_later_steps() {
        let (engine, handles) = recording_engine();

        engine
            .process_interactive(
                &RunContext::new(),
                "下载 https://a.com/v.mp4，剪辑，翻译，上传，报告，邮件 ops@team.com",
            )
            .await
            .unwrap();

        assert_eq!(handles[ids::EDITOR].inputs(), vec!["fetched.mp4;00:00:00;00:01:00"]);
        assert_eq!(handles[ids::TRANSLATOR].inputs(), vec!["fetched.mp4"]);
        assert_eq!(handles[ids::UPLOADER].inputs(), vec!["fetched.mp4"]);
        assert_eq!(handles[ids::REPORTER].inputs(), vec!["fetched.mp4"]);
        assert!(handles[ids::NOTIFIER].inputs()[0].starts_with("ops@team.com;"));
    }

    #[tokio::test]
    async fn test_edit_only_uses_conventional_media_name() {
        let (engine, handles) = recording_engine();

        engine
            .process_interactive(&RunContext::new(), "剪辑 https://a.com/v.mp4")
            .await
            .unwrap();

        assert_eq!(handles[ids::DOWNLOADER].call_count(), 0);
        assert_eq!(
            handles[ids::EDITOR].inputs(),
            vec!["downloaded_video.mp4;00:00:00;00:01:00"]
        );
    }

    #[tokio::test]
    async fn test_failure_at_step_two_skips_step_three() {
        let downloader = Arc::new(RecordingTool::new(ids::DOWNLOADER));
        let uploader = Arc::new(RecordingTool::new(ids::UPLOADER));
        let registry = ToolRegistry::new()
            .with_tool(downloader.clone())
            .with_tool(Arc::new(FailingTool::new(ids::TRANSLATOR, "no audio track")))
            .with_tool(uploader.clone());

        let err = engine_over(registry)
            .process_interactive(&RunContext::new(), "翻译 https://a.com/v.mp4 并上传")
            .await
            .unwrap_err();

        assert_eq!(err.step(), Some(2));
        assert!(err.to_string().contains("Step 2/3"));
        assert_eq!(downloader.call_count(), 1);
        assert_eq!(uploader.call_count(), 0);
    }

    #[tokio::test]
    async fn test_replanning_is_idempotent() {
        let (engine, _) = recording_engine();
        let text = "下载 https://backup.com/archive.mp4,剪辑视频, 并上传到COS，然后生成报告发给 storage@admin.com";
        assert_eq!(engine.plan(text), engine.plan(text));
    }

    #[tokio::test]
    async fn test_malformed_editor_input_is_format_error() {
        let config = EngineConfig::instant();
        let registry = builtin_registry(&config.tools);
        let ctx = RunContext::new();

        let tool = registry.get(ids::EDITOR).unwrap();
        let err = tool.invoke(&ctx, "clip.mp4;00:00:10").await.unwrap_err();
        assert!(err.to_string().contains("invalid input"));

        let plan = crate::planner::Plan::new(vec![crate::planner::WorkflowStep::templated(
            ids::EDITOR,
            "${primary_media_path}",
            "Cut a clip",
        )]);
        let err = WorkflowExecutor::new(Arc::new(registry))
            .execute(&ctx, &plan)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "step_failed");
        assert_eq!(err.step(), Some(1));
    }

    #[tokio::test]
    async fn test_cancelled_request_stops_before_next_step() {
        let slow = Arc::new(SlowTool::new(ids::DOWNLOADER, Duration::from_secs(30)));
        let translator = Arc::new(RecordingTool::new(ids::TRANSLATOR));
        let engine = engine_over(
            ToolRegistry::new()
                .with_tool(slow)
                .with_tool(translator.clone()),
        );
        let token = Arc::new(CancellationToken::new());
        let ctx = RunContext::new().with_token(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel("interrupted by user");
        });
        let err = engine
            .process_interactive(&ctx, "translate https://a.com/v.mp4")
            .await
            .unwrap_err();
        canceller.await.unwrap();

        assert!(err.is_cancellation());
        assert_eq!(err.step(), Some(1));
        assert!(err.to_string().contains("interrupted by user"));
        assert_eq!(translator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_deadline_cancels_request() {
        let engine = engine_over(
            ToolRegistry::new().with_tool(Arc::new(SlowTool::with_delay_ms(ids::DOWNLOADER, 5_000))),
        );
        let ctx = RunContext::new().with_timeout(Duration::from_millis(20));

        let err = engine
            .process_interactive(&ctx, "download https://a.com/v.mp4")
            .await
            .unwrap_err();

        assert!(err.is_cancellation());
        assert!(err.to_string().contains(crate::context::DEADLINE_EXCEEDED));
    }

    #[tokio::test]
    async fn test_concurrent_requests_are_isolated() {
        let (engine, handles) = recording_engine();

        let first = RunContext::new();
        let second = RunContext::new();
        let (a, b) = tokio::join!(
            engine.process_interactive(&first, "剪辑 https://a.com/1.mp4"),
            engine.process_interactive(&second, "下载 https://b.com/2.mp4 并剪辑"),
        );
        a.unwrap();
        b.unwrap();

        assert_eq!(
            first.artifacts().get(PRIMARY_MEDIA_PATH).as_deref(),
            Some("downloaded_video.mp4")
        );
        assert_eq!(second.artifacts().get(PRIMARY_MEDIA_PATH).as_deref(), Some("fetched.mp4"));
        assert_eq!(handles[ids::EDITOR].call_count(), 2);
    }

    #[tokio::test]
    async fn test_successful_run_event_sequence() {
        let (engine, _) = recording_engine();
        let sink = Arc::new(CollectingEventSink::new());
        let ctx = RunContext::new().with_event_sink(sink.clone());

        engine
            .process_interactive(&ctx, "download https://a.com/v.mp4 and upload")
            .await
            .unwrap();

        assert_eq!(
            sink.event_types(),
            vec![
                "workflow.planned",
                "workflow.started",
                "step.started",
                "step.completed",
                "step.started",
                "step.completed",
                "workflow.completed"
            ]
        );
    }

    #[tokio::test]
    async fn test_cancellation_interrupts_pending_confirmation() {
        let (engine, handles) = recording_engine();
        let engine = engine.with_confirmer(Arc::new(SlowConfirmer { delay: None }));
        let token = Arc::new(CancellationToken::new());
        let sink = Arc::new(CollectingEventSink::new());
        let ctx = RunContext::new()
            .with_token(token.clone())
            .with_event_sink(sink.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel("interrupted by user");
        });
        let err = tokio::time::timeout(
            Duration::from_secs(5),
            engine.process_batch(&ctx, "下载视频 https://a.com/v.mp4"),
        )
        .await
        .expect("confirmation should be abandoned")
        .unwrap_err();
        canceller.await.unwrap();

        assert!(err.is_cancellation());
        assert_eq!(err.step(), Some(1));
        assert!(handles.values().all(|tool| tool.call_count() == 0));
        assert_eq!(sink.event_types(), vec!["workflow.planned", "workflow.cancelled"]);
    }

    #[tokio::test]
    async fn test_timeout_starts_after_confirmation() {
        let (engine, handles) = recording_engine();
        let engine = engine.with_confirmer(Arc::new(SlowConfirmer {
            delay: Some(Duration::from_millis(60)),
        }));
        let ctx = RunContext::new().with_timeout(Duration::from_millis(30));

        let outcome = engine
            .process_batch(&ctx, "下载视频 https://a.com/v.mp4")
            .await
            .unwrap();

        assert_eq!(outcome, RequestOutcome::Completed { steps: 1 });
        assert_eq!(handles[ids::DOWNLOADER].call_count(), 1);
    }

    #[tokio::test]
    async fn test_url_with_placeholder_syntax_reaches_downloader_verbatim() {
        let (engine, handles) = recording_engine();

        for url in [
            "https://cdn.example.com/v/${id}.mp4",
            "https://cdn.example.com/${primary_media_path}",
        ] {
            let outcome = engine
                .process_interactive(&RunContext::new(), &format!("下载视频 {url}"))
                .await
                .unwrap();
            assert_eq!(outcome, RequestOutcome::Completed { steps: 1 });
        }

        assert_eq!(
            handles[ids::DOWNLOADER].inputs(),
            vec![
                "https://cdn.example.com/v/${id}.mp4",
                "https://cdn.example.com/${primary_media_path}"
            ]
        );
    }
}
