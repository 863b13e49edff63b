use crate::app::{App, InputMode, ScreenState};
use crate::stats::{format_time, PuzzleResult};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use std::io;
use switches_core::HELP_MESSAGE;

/// Columns taken by one switch, housing plus gap
const SWITCH_WIDTH: u16 = 7;

pub fn render(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    let (term_width, term_height) = terminal::size()?;

    execute!(
        stdout,
        Hide,
        SetBackgroundColor(app.theme.bg),
        Clear(ClearType::All)
    )?;

    match app.screen_state {
        ScreenState::Playing => render_game_screen(stdout, app, term_width, term_height)?,
        ScreenState::Stats => render_stats_screen(stdout, app, term_width)?,
    }

    if app.mode == InputMode::Command {
        execute!(stdout, Show)?;
    }
    Ok(())
}

fn render_game_screen(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let switches_width = SWITCH_WIDTH * app.module.switch_count() as u16;
    let total_width = switches_width + 4 + 26; // switches + gap + side panel
    let start_x = if term_width > total_width {
        (term_width - total_width) / 2
    } else {
        1
    };
    let start_y = if term_height > 24 { 2 } else { 1 };

    render_title(stdout, app, start_x, start_y)?;
    render_switches(stdout, app, start_x, start_y + 3)?;
    render_info_panel(stdout, app, start_x, start_y + 13)?;

    if app.show_manual {
        render_manual(stdout, app, start_x + switches_width + 4, start_y + 3)?;
    }

    render_controls(stdout, app, start_x, start_y + 19)?;

    if let Some(ref msg) = app.message {
        render_message(stdout, app, msg, term_width)?;
    }

    // Last, so the cursor ends on the command line
    render_command_line(stdout, app, start_x, start_y + 17)
}

fn render_title(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.key),
        Print("═══ SWITCHES ═══"),
        MoveTo(x, y + 1),
        SetForegroundColor(theme.info),
        Print(format!(
            "Module #{}  rule seed {}  instance {:#x}",
            app.module.id(),
            app.seeds.rule_seed,
            app.seeds.instance_seed
        ))
    )?;
    Ok(())
}

fn render_switches(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let goal = app.module.goal_configuration();

    // Layout per switch:
    //   ●        goal indicator
    // ┌───┐
    // │███│      lever in the upper half when up
    // │   │
    // └───┘
    //   1
    for (i, &up) in app.module.switch_states().iter().enumerate() {
        let sx = x + i as u16 * SWITCH_WIDTH;

        let (led, led_color) = if goal.is_up(i) {
            ("●", theme.goal_lit)
        } else {
            ("○", theme.goal_unlit)
        };
        execute!(
            stdout,
            MoveTo(sx + 2, y),
            SetForegroundColor(led_color),
            Print(led)
        )?;

        let (top, bottom) = if up { ("███", "   ") } else { ("   ", "███") };
        execute!(
            stdout,
            MoveTo(sx, y + 1),
            SetForegroundColor(theme.border),
            Print("┌───┐"),
            MoveTo(sx, y + 2),
            Print("│"),
            SetForegroundColor(theme.lever),
            Print(top),
            SetForegroundColor(theme.border),
            Print("│"),
            MoveTo(sx, y + 3),
            Print("│"),
            SetForegroundColor(theme.lever),
            Print(bottom),
            SetForegroundColor(theme.border),
            Print("│"),
            MoveTo(sx, y + 4),
            Print("└───┘"),
            MoveTo(sx + 2, y + 5),
            SetForegroundColor(theme.key),
            Print(i + 1)
        )?;
    }

    let current = app.module.current_configuration();
    execute!(
        stdout,
        MoveTo(x, y + 7),
        SetForegroundColor(theme.fg),
        Print(format!("Current: {}", current))
    )?;
    if let Some(attempted) = app.last_strike {
        execute!(
            stdout,
            MoveTo(x, y + 8),
            SetForegroundColor(theme.error),
            Print(format!("Tried:   {}", attempted))
        )?;
    }
    Ok(())
}

fn render_info_panel(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let module = &app.module;

    let (status, color) = if module.is_solved() {
        ("Solved".to_string(), theme.success)
    } else if app.is_replaying() {
        (
            format!("Auto-solving, {} flips left", app.replay_remaining()),
            theme.key,
        )
    } else {
        ("Unsolved".to_string(), theme.fg)
    };

    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(color),
        Print(format!("Status:  {}", status)),
        MoveTo(x, y + 1),
        SetForegroundColor(theme.info),
        Print(format!("Time:    {}", format_time(app.elapsed_secs()))),
        MoveTo(x, y + 2),
        Print(format!("Toggles: {}", module.toggles())),
        MoveTo(x, y + 3),
        SetForegroundColor(if module.strikes() > 0 {
            theme.error
        } else {
            theme.info
        }),
        Print(format!("Strikes: {}", module.strikes()))
    )?;
    Ok(())
}

/// The forbidden list, as the defuser's manual shows it
fn render_manual(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let forbidden = app.module.forbidden_set();

    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.key),
        Print("Never pass through:")
    )?;

    for (row, config) in forbidden.iter().enumerate() {
        let arrows: String = config
            .to_bits()
            .iter()
            .map(|&up| if up { '▲' } else { '▼' })
            .collect();
        let color = if app.last_strike == Some(config) {
            theme.error
        } else {
            theme.info
        };
        execute!(
            stdout,
            MoveTo(x, y + 1 + row as u16),
            SetForegroundColor(color),
            Print(format!("{:>2}  {}", config.value(), arrows))
        )?;
    }
    Ok(())
}

fn render_command_line(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    match app.mode {
        InputMode::Command => {
            let line = format!(":{}", app.command_buffer);
            execute!(
                stdout,
                MoveTo(x, y),
                SetBackgroundColor(theme.highlight_bg),
                SetForegroundColor(theme.fg),
                Print(format!("{:<40}", line)),
                SetBackgroundColor(theme.bg),
                MoveTo(x + line.chars().count() as u16, y)
            )?;
        }
        InputMode::Normal => {
            execute!(
                stdout,
                MoveTo(x, y),
                SetForegroundColor(theme.info),
                Print(HELP_MESSAGE.replace("!{0} ", ":"))
            )?;
        }
    }
    Ok(())
}

fn render_controls(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;

    let controls = [
        ("1-5", "Flip"),
        (":", "Command"),
        ("a", "Auto-solve"),
        ("n", "New puzzle"),
        ("m", "Manual"),
        ("i", "Stats"),
        ("t", "Theme"),
        ("q", "Quit"),
    ];

    // Display in 4 columns (2 items each)
    for (i, (key, desc)) in controls.iter().enumerate() {
        let col = i / 2;
        let row = i % 2;
        let cx = x + (col as u16) * 16;
        let cy = y + row as u16;

        execute!(
            stdout,
            MoveTo(cx, cy),
            SetForegroundColor(theme.key),
            Print(format!("{:>4}", key)),
            SetForegroundColor(theme.info),
            Print(format!(" {}", desc))
        )?;
    }

    Ok(())
}

fn render_message(
    stdout: &mut io::Stdout,
    app: &App,
    msg: &str,
    term_width: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let padded = format!("  {}  ", msg);
    let x = term_width.saturating_sub(padded.chars().count() as u16) / 2;

    execute!(
        stdout,
        MoveTo(x, 0),
        SetForegroundColor(theme.fg),
        SetBackgroundColor(theme.highlight_bg),
        Print(&padded),
        SetBackgroundColor(theme.bg)
    )?;

    Ok(())
}

fn render_stats_screen(stdout: &mut io::Stdout, app: &App, term_width: u16) -> io::Result<()> {
    let theme = &app.theme;
    let player = &app.stats.player;

    let title = "═══ STATISTICS ═══";
    let title_x = term_width.saturating_sub(title.chars().count() as u16) / 2;
    execute!(
        stdout,
        MoveTo(title_x, 1),
        SetForegroundColor(theme.key),
        Print(title)
    )?;

    let x = 4u16;
    let lines = [
        (format!("Puzzles:      {}", player.puzzles), theme.info),
        (format!("Solved:       {}", player.solves), theme.success),
        (format!("Auto-solved:  {}", player.auto_solves), theme.info),
        (format!("Abandoned:    {}", player.abandoned), theme.info),
        (format!("Strikes:      {}", player.strikes), theme.error),
        (format!("Solve rate:   {:.0}%", player.solve_rate()), theme.info),
        (
            format!(
                "Clean streak: {} (best {})",
                player.clean_streak, player.best_clean_streak
            ),
            theme.info,
        ),
        (
            format!(
                "Best time:    {}",
                player
                    .best_time_secs
                    .map(format_time)
                    .unwrap_or_else(|| "--:--".to_string())
            ),
            theme.info,
        ),
    ];
    for (row, (line, color)) in lines.iter().enumerate() {
        execute!(
            stdout,
            MoveTo(x, 3 + row as u16),
            SetForegroundColor(*color),
            Print(line)
        )?;
    }

    let history_y = 4 + lines.len() as u16;
    execute!(
        stdout,
        MoveTo(x, history_y),
        SetForegroundColor(theme.key),
        Print("Recent puzzles")
    )?;
    for (row, record) in app.stats.history.iter().take(10).enumerate() {
        let (result, color) = match record.result {
            PuzzleResult::Solved => ("solved", theme.success),
            PuzzleResult::AutoSolved => ("auto", theme.info),
            PuzzleResult::Abandoned => ("abandoned", theme.error),
        };
        execute!(
            stdout,
            MoveTo(x, history_y + 1 + row as u16),
            SetForegroundColor(color),
            Print(format!(
                "{:<10} rule {:<11} {:>3} toggles {:>2} strikes {:>6}",
                result,
                record.seeds.rule_seed,
                record.toggles,
                record.strikes,
                format_time(record.time_secs)
            ))
        )?;
    }

    execute!(
        stdout,
        MoveTo(x, history_y + 12),
        SetForegroundColor(theme.info),
        Print("i/Esc: back")
    )?;
    Ok(())
}
