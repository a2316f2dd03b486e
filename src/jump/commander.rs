use crate::infra::tmux::{CommandRunner, Tmux};

use super::PaneTarget;

/// Keys that move a vim-family editor to `line_number` and center the view.
/// The two Escapes leave insert/visual/command-line mode first.
pub fn jump_keys(line_number: u32) -> Vec<String> {
    vec![
        "Escape".to_string(),
        "Escape".to_string(),
        line_number.to_string(),
        "gg".to_string(),
        "zz".to_string(),
    ]
}

/// Focuses `target` and sends the jump keys to it.
///
/// Runs `select-window`, `select-pane` and `send-keys` as three independent
/// tmux invocations. A failing step is logged and the remaining steps still
/// run, so a stale window reference does not prevent the key send.
pub fn activate<R: CommandRunner>(tmux: &Tmux<R>, target: &PaneTarget, line_number: u32) {
    let window_target = target.window_target();

    if let Err(e) = tmux.select_window(&window_target) {
        tracing::error!("Failed to select window {window_target}: {e}");
    }

    if let Err(e) = tmux.select_pane(&target.pane_id) {
        tracing::error!("Failed to select pane {}: {e}", target.pane_id);
    }

    let keys = jump_keys(line_number);
    let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
    if let Err(e) = tmux.send_keys(&window_target, &keys) {
        tracing::error!("Failed to send keys to {window_target}: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::tmux::testing::MockCommandRunner;
    use rstest::rstest;

    fn target() -> PaneTarget {
        PaneTarget {
            session_name: "paper".to_string(),
            window_index: 2,
            pane_id: "%7".to_string(),
        }
    }

    #[rstest]
    #[case::single_digit(1, "1")]
    #[case::multi_digit(1234, "1234")]
    fn test_jump_keys(#[case] line: u32, #[case] digits: &str) {
        assert_eq!(jump_keys(line), vec!["Escape", "Escape", digits, "gg", "zz"]);
    }

    #[test]
    fn test_activate_runs_three_steps_in_order() {
        let tmux = Tmux::new(MockCommandRunner::new());

        activate(&tmux, &target(), 42);

        assert_eq!(
            tmux_calls(&tmux),
            vec![
                "select-window -t paper:2",
                "select-pane -t %7",
                "send-keys -t paper:2 Escape Escape 42 gg zz",
            ]
        );
    }

    #[rstest]
    #[case::select_window_fails(MockCommandRunner::new().with_exit_code(1))]
    #[case::select_pane_fails(MockCommandRunner::new().with_stdout("").with_exit_code(1))]
    #[case::tmux_missing(
        MockCommandRunner::new()
            .with_spawn_error()
            .with_spawn_error()
            .with_spawn_error()
    )]
    fn test_activate_continues_after_failures(#[case] runner: MockCommandRunner) {
        let tmux = Tmux::new(runner);

        activate(&tmux, &target(), 7);

        let calls = tmux_calls(&tmux);
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[2], "send-keys -t paper:2 Escape Escape 7 gg zz");
    }

    fn tmux_calls(tmux: &Tmux<MockCommandRunner>) -> Vec<String> {
        tmux.runner().calls()
    }
}
