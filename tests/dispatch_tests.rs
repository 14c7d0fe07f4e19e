mod support;

use diatheke::protocol::pb;
use diatheke::{ActionHandlers, Client, CommandStatus, Dispatcher, Error, SessionInput};
use std::sync::{Arc, Mutex};
use support::{MockTransport, command, input_needed, reply, transcribe};

type Log = Arc<Mutex<Vec<String>>>;

fn recording_handlers(log: &Log) -> ActionHandlers {
    let (on_input, on_command, on_reply, on_end) = (log.clone(), log.clone(), log.clone(), log.clone());
    ActionHandlers::new()
        .on_input(move |_ctx, _wait| {
            let log = on_input.clone();
            async move {
                log.lock().unwrap().push("input".to_string());
                Ok(SessionInput::text("bye"))
            }
        })
        .on_command(move |_ctx, cmd| {
            let log = on_command.clone();
            async move {
                log.lock().unwrap().push(format!("command:{}", cmd.id));
                Ok(CommandStatus::for_action(&cmd).succeeded())
            }
        })
        .on_reply(move |_ctx, reply| {
            let log = on_reply.clone();
            async move {
                log.lock().unwrap().push(format!("reply:{}", reply.text));
                Ok(())
            }
        })
        .on_end(move |_ctx| {
            let log = on_end.clone();
            async move {
                log.lock().unwrap().push("end".to_string());
                Ok(())
            }
        })
}

async fn connect(mock: &MockTransport) -> Client {
    Client::builder().transport(mock.clone()).connect().await.unwrap()
}

#[tokio::test]
async fn command_is_answered_before_input_needed() {
    let mock = MockTransport::new();
    mock.inner().initial = vec![command("lights_on", "s1"), input_needed()];
    mock.then(vec![reply("lights are on"), input_needed()]).then(Vec::new());
    let client = connect(&mock).await;
    let mut session = client.create_session("model-A").await.unwrap();

    let log = Log::default();
    Dispatcher::new(recording_handlers(&log)).run(&mut session).await.unwrap();

    assert_eq!(
        *log.lock().unwrap(),
        vec!["command:lights_on", "reply:lights are on", "input", "end"]
    );
    let inner = mock.inner();
    assert!(matches!(inner.updates[0].input, Some(pb::session_input::Input::Cmd(_))));
    assert!(matches!(inner.updates[1].input, Some(pb::session_input::Input::Text(_))));
    assert!(session.is_ended());
}

#[tokio::test]
async fn answering_input_before_pending_command_is_out_of_order() {
    let mock = MockTransport::new();
    mock.inner().initial = vec![command("lights_on", "s1"), input_needed()];
    let client = connect(&mock).await;
    let mut session = client.create_session("model-A").await.unwrap();

    let err = session.process_text("what's the weather").await.unwrap_err();
    assert!(matches!(err, Error::OutOfOrder(_)));
    assert!(mock.inner().updates.is_empty());
}

#[tokio::test]
async fn replies_run_in_order_before_following_command() {
    let mock = MockTransport::new();
    mock.inner().initial = vec![reply("first"), reply("second"), command("order_pizza", "s3")];
    mock.then(Vec::new());
    let client = connect(&mock).await;
    let mut session = client.create_session("model-A").await.unwrap();

    let log = Log::default();
    Dispatcher::new(recording_handlers(&log)).run(&mut session).await.unwrap();

    assert_eq!(
        *log.lock().unwrap(),
        vec!["reply:first", "reply:second", "command:order_pizza", "end"]
    );
}

#[tokio::test]
async fn reply_only_batch_waits_for_input() {
    let mock = MockTransport::new();
    mock.inner().initial = vec![reply("welcome")];
    mock.then(Vec::new());
    let client = connect(&mock).await;
    let mut session = client.create_session("model-A").await.unwrap();

    let log = Log::default();
    let dispatcher = Dispatcher::new(recording_handlers(&log));
    assert!(dispatcher.step(&mut session).await.unwrap());
    assert!(!dispatcher.step(&mut session).await.unwrap());

    assert_eq!(*log.lock().unwrap(), vec!["reply:welcome", "input", "end"]);
}

#[tokio::test]
async fn mismatched_status_from_handler_is_rejected() {
    let mock = MockTransport::new();
    mock.inner().initial = vec![command("lights_on", "s1")];
    let client = connect(&mock).await;
    let mut session = client.create_session("model-A").await.unwrap();

    let handlers = ActionHandlers::new()
        .on_command(|_ctx, _cmd| async { Ok(CommandStatus::new("something_else", "s1").succeeded()) });
    let err = Dispatcher::new(handlers).run(&mut session).await.unwrap_err();

    assert!(matches!(err, Error::InvalidInput(_)));
    assert!(mock.inner().updates.is_empty());
}

#[tokio::test]
async fn missing_input_handler_is_reported() {
    let mock = MockTransport::new();
    let client = connect(&mock).await;
    let mut session = client.create_session("model-A").await.unwrap();

    let err = Dispatcher::new(ActionHandlers::new()).run(&mut session).await.unwrap_err();
    assert!(matches!(err, Error::Handler(_)));
}

#[tokio::test]
async fn transcribe_action_is_answered_with_transcript() {
    let mock = MockTransport::new();
    mock.inner().initial = vec![transcribe("note")];
    mock.then(Vec::new());
    let client = connect(&mock).await;
    let mut session = client.create_session("model-A").await.unwrap();

    let handlers = ActionHandlers::new().on_transcribe(|ctx, action| async move {
        let mut stream = ctx.new_transcribe_stream(&action).await?;
        stream.send_audio(b"buy milk").await?;
        stream.send_finished()?;
        let mut transcript = String::new();
        while let Some(result) = stream.next_result().await? {
            if !result.is_partial {
                transcript = result.text;
            }
        }
        Ok(transcript)
    });
    Dispatcher::new(handlers).run(&mut session).await.unwrap();

    let inner = mock.inner();
    match &inner.updates[0].input {
        Some(pb::session_input::Input::Text(text)) => assert_eq!(text.text, "buy milk"),
        other => panic!("unexpected input: {other:?}"),
    }
}
