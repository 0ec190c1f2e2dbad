//! Flap Rush entry point
//!
//! Loads settings, runs the pre-game menu, opens the save store and runs the
//! terminal game loop.
//! Logs go to stderr; redirect it (`2>flap-rush.log`) to keep the screen clean.

use std::io::{self, Write};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crossterm::{
    ExecutableCommand, cursor,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};

use flap_rush::consts::SIM_DT;
use flap_rush::persistence::SaveStore;
use flap_rush::platform::{TerminalCanvas, poll_input, run_menu};
use flap_rush::render::draw_frame;
use flap_rush::session::{Control, Session};
use flap_rush::settings::Settings;

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5eed)
}

fn run<W: Write>(out: &mut W, session: &mut Session) -> io::Result<()> {
    let frame_time = Duration::from_secs_f32(SIM_DT);
    let mut last = Instant::now();

    loop {
        let (cols, rows) = terminal::size()?;
        let input = poll_input(frame_time, session.phase())?;

        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32();
        last = now;

        match session.update(dt, input) {
            Control::Quit => return Ok(()),
            Control::Continue(events) => {
                for event in events {
                    log::debug!("{event:?}");
                }
            }
        }

        let mut canvas = TerminalCanvas::new(cols, rows);
        draw_frame(session.state(), &mut canvas);
        canvas.present(out)?;
    }
}

/// Menu, then the game. The session's own quit path saves; a failed loop
/// saves here before the terminal is restored.
fn play<W: Write>(out: &mut W, settings: &Settings) -> io::Result<()> {
    let Some(selection) = run_menu(out, settings.selection())? else {
        log::info!("Quit from the menu");
        return Ok(());
    };
    let seed = settings.seed.unwrap_or_else(time_seed);
    let store = SaveStore::new(settings.save_path.clone());
    let mut session = Session::start(selection, store, seed);

    let result = run(out, &mut session);
    if result.is_err() {
        session.shutdown();
    }
    result
}

fn main() -> io::Result<()> {
    env_logger::init();
    log::info!("Flap Rush starting...");

    let settings = Settings::load(&Settings::default_path());

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(cursor::Hide)?;

    let result = play(&mut stdout, &settings);

    // Restore the terminal even if the game failed; the game's error wins
    let restored = stdout
        .execute(cursor::Show)
        .and_then(|out| out.execute(LeaveAlternateScreen))
        .map(|_| ());
    let raw = terminal::disable_raw_mode();
    result.and(restored).and(raw)
}
