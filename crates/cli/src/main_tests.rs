// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use clap::CommandFactory;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("rec").chain(args.iter().copied())).unwrap()
}

#[test]
fn cli_definition_is_valid() {
    Cli::command().debug_assert();
}

#[test]
fn global_flags_work_after_subcommand() {
    let cli = parse(&["status", "--port", "9000", "--token", "t", "--json"]);

    assert!(matches!(cli.command, Commands::Status));
    assert_eq!(cli.port, Some(9000));
    assert_eq!(cli.token.as_deref(), Some("t"));
    assert!(cli.json);
    assert_eq!(cli.host, "127.0.0.1");
}

#[test]
fn start_takes_target_and_options() {
    let cli = parse(&["start", "twitch.tv/foo", "--channel", "Foo", "-q", "720p"]);

    match cli.command {
        Commands::Start(args) => {
            assert_eq!(args.target, "twitch.tv/foo");
            assert_eq!(args.channel.as_deref(), Some("Foo"));
            assert_eq!(args.quality.as_deref(), Some("720p"));
        }
        _ => panic!("expected start"),
    }
}

#[yare::parameterized(
    all = { &["stop"],        None },
    one = { &["stop", "foo"], Some("foo") },
)]
fn stop_channel_is_optional(args: &[&str], expected: Option<&str>) {
    match parse(args).command {
        Commands::Stop { channel } => assert_eq!(channel.as_deref(), expected),
        _ => panic!("expected stop"),
    }
}

#[yare::parameterized(
    restart = { "restart", AgentCommand::Restart },
    kill    = { "kill",    AgentCommand::Kill },
)]
fn agent_subcommands(name: &str, expected: AgentCommand) {
    match parse(&["agent", name]).command {
        Commands::Agent { command } => assert_eq!(command, expected),
        _ => panic!("expected agent"),
    }
}

#[test]
fn port_must_fit_u16() {
    assert!(Cli::try_parse_from(["rec", "--port", "70000", "health"]).is_err());
}
