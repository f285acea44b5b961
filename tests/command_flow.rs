//! Integration tests for command dispatch through a running bot.

mod common;

use common::TestBot;
use std::convert::Infallible;
use std::time::Duration;
use tmi_bot::{
    Bot, Command, CommandArgs, ErrorReplyPolicy, HandlerResult, OutgoingMessage, Parameter,
};

const QUIET: Duration = Duration::from_millis(200);

fn greet(args: &CommandArgs) -> HandlerResult {
    let name = args.get("name").unwrap_or_default();
    Ok(Some(OutgoingMessage::say(format!("hi {name}"))))
}

fn points_command() -> Command {
    Command::new("points", "Manage points", |_| Ok(Some(OutgoingMessage::say("points: 0"))))
        .subcommand(
            Command::new("add", "Give points", |args: &CommandArgs| {
                Ok(Some(OutgoingMessage::reply(format!(
                    "{} +{}",
                    args.get("user").unwrap_or_default(),
                    args.get("amount").unwrap_or_default()
                ))))
            })
            .elevated()
            .param(Parameter::required("user"))
            .param(Parameter::with_default("amount", "1").validate(|v| v.parse::<u32>().is_ok())),
        )
}

async fn spawn(policy: ErrorReplyPolicy) -> TestBot {
    TestBot::spawn_with(|outbox, shutdown| {
        let bot = Bot::new(outbox, shutdown).with_error_policy(policy);
        bot.add_command(
            Command::new("greet", "Greet someone", greet).param(Parameter::required("name")),
        );
        bot.add_command(points_command());
        Ok::<_, Infallible>(bot)
    })
    .await
    .expect("Failed to spawn test bot")
}

#[tokio::test]
async fn test_greet_with_quoted_name() {
    let mut bot = spawn(ErrorReplyPolicy::Silent).await;
    let alice = bot.client("lobby", "alice");

    alice.say("!greet \"new friend\"").await.unwrap();

    let out = bot.recv().await.expect("no reply");
    assert_eq!(out.channel, "lobby");
    assert_eq!(out.text, "hi new friend");
    assert!(!out.send_as_reply);
}

#[tokio::test]
async fn test_command_name_is_case_insensitive() {
    let mut bot = spawn(ErrorReplyPolicy::Silent).await;
    bot.client("lobby", "alice").say("!GREET bob").await.unwrap();
    assert_eq!(bot.recv().await.unwrap().text, "hi bob");
}

#[tokio::test]
async fn test_user_errors_are_silent_by_default() {
    let mut bot = spawn(ErrorReplyPolicy::Silent).await;
    let alice = bot.client("lobby", "alice");

    alice.say("!nope").await.unwrap();
    alice.say("!greet").await.unwrap();
    alice.say("!greet a b").await.unwrap();
    alice.say("!points add bob").await.unwrap();
    alice.say("!").await.unwrap();

    bot.expect_silence(QUIET).await;
}

#[tokio::test]
async fn test_reply_threads_under_invoking_message() {
    let mut bot = spawn(ErrorReplyPolicy::Silent).await;
    let moderator = bot.client("lobby", "mod").moderator();

    let id = moderator.say("!points add bob 5").await.unwrap();

    let out = bot.recv().await.unwrap();
    assert_eq!(out.text, "bob +5");
    assert!(out.send_as_reply);
    assert_eq!(out.parent_id.as_deref(), Some(id.as_str()));
}

#[tokio::test]
async fn test_subcommand_defaults_and_validation() {
    let mut bot = spawn(ErrorReplyPolicy::Silent).await;
    let moderator = bot.client("lobby", "mod").moderator();

    moderator.say("!points add bob").await.unwrap();
    assert_eq!(bot.recv().await.unwrap().text, "bob +1");

    moderator.say("!points add bob lots").await.unwrap();
    bot.expect_silence(QUIET).await;

    // Unknown subcommand token stays an argument of the parent, which takes none.
    moderator.say("!points remove").await.unwrap();
    bot.expect_silence(QUIET).await;

    moderator.say("!points").await.unwrap();
    assert_eq!(bot.recv().await.unwrap().text, "points: 0");
}

#[tokio::test]
async fn test_notify_policy_answers_user_errors() {
    let mut bot = spawn(ErrorReplyPolicy::Notify).await;
    let alice = bot.client("lobby", "alice");

    let id = alice.say("!points add bob").await.unwrap();

    let out = bot.recv().await.unwrap();
    assert_eq!(out.channel, "lobby");
    assert!(out.send_as_reply);
    assert_eq!(out.parent_id.as_deref(), Some(id.as_str()));
    assert!(out.text.contains("points add"));
}

#[tokio::test]
async fn test_messages_processed_in_arrival_order() {
    let mut bot = spawn(ErrorReplyPolicy::Silent).await;
    let alice = bot.client("lobby", "alice");

    for i in 0..20 {
        alice.say(&format!("!greet n{i}")).await.unwrap();
    }

    let texts: Vec<_> = bot
        .recv_until(|msg| msg.text == "hi n19")
        .await
        .unwrap()
        .into_iter()
        .map(|msg| msg.text)
        .collect();
    let expected: Vec<_> = (0..20).map(|i| format!("hi n{i}")).collect();
    assert_eq!(texts, expected);
}

#[tokio::test]
async fn test_panicking_handler_does_not_stop_the_bot() {
    let mut bot = spawn(ErrorReplyPolicy::Silent).await;
    bot.bot
        .add_command(Command::new("boom", "", |_| panic!("handler exploded")));
    let alice = bot.client("lobby", "alice");

    alice.say("!boom").await.unwrap();
    alice.say("!greet after").await.unwrap();

    assert_eq!(bot.recv().await.unwrap().text, "hi after");
}

#[tokio::test]
async fn test_help_lists_visible_commands() {
    let mut bot = TestBot::spawn("").await.expect("Failed to spawn test bot");
    bot.bot.add_command(
        Command::new("greet", "Greet someone", greet).param(Parameter::required("name")),
    );
    bot.bot
        .add_command(Command::new("secret", "", |_| Ok(None)).elevated());
    let alice = bot.client("lobby", "alice");

    alice.say("!help").await.unwrap();
    assert_eq!(bot.recv().await.unwrap().text, "Commands: !greet !help");

    alice.say("!help greet").await.unwrap();
    assert_eq!(
        bot.recv().await.unwrap().text,
        "!greet <name> - Greet someone"
    );

    bot.shutdown().await.unwrap();
}
