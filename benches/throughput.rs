use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;
use tmi_bot::commands::{CommandRegistry, Dispatcher, tokenize};
use tmi_bot::{
    Command, CommandArgs, IncomingCommand, IncomingMessage, Outbox, OutgoingMessage, Parameter,
};

// Dispatch is measured against a draining task instead of a real sink.

fn tokenize_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");
    let line = r#"points add "some viewer" 250 "a longer quoted note with spaces" trailing"#;
    group.throughput(Throughput::Bytes(line.len() as u64));

    group.bench_function("mixed_quotes", |b| b.iter(|| tokenize(black_box(line))));

    group.finish();
}

fn dispatch_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime");

    let registry = Arc::new(CommandRegistry::new());
    registry.register(
        Command::new("greet", "", |args: &CommandArgs| {
            Ok(Some(OutgoingMessage::say(format!(
                "hi {}",
                args.get("name").unwrap_or_default()
            ))))
        })
        .param(Parameter::required("name")),
    );
    let (outbox, mut rx) = Outbox::channel(1024);
    runtime.spawn(async move { while rx.recv().await.is_some() {} });
    let dispatcher = Dispatcher::new(registry, outbox);

    let message = IncomingMessage::new("lobby", "alice", "!greet \"new friend\"").with_id("m1");
    let command = IncomingCommand::parse(&message, '!')
        .expect("not a command")
        .expect("empty command");

    let mut group = c.benchmark_group("dispatch");
    group.throughput(Throughput::Elements(1));

    group.bench_function("parse_command", |b| {
        b.iter(|| IncomingCommand::parse(black_box(&message), '!'))
    });

    group.bench_function("dispatch_reply", |b| {
        b.to_async(&runtime).iter(|| async {
            let _ = dispatcher.dispatch(black_box(&command)).await;
        })
    });

    group.finish();
}

criterion_group!(benches, tokenize_benchmark, dispatch_benchmark);
criterion_main!(benches);
