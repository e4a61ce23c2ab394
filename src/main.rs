mod config;
mod format;
mod games;
mod i18n;
mod input;
mod logging;
mod storage;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph};
use ratzilla::ratatui::{Frame, Terminal};
use ratzilla::{DomBackend, WebRenderer};

use config::GameConfig;
use games::clicker::catalog::Catalog;
use games::clicker::ClickerGame;
use games::Game;
use input::{ClickState, InputEvent};
use time::GameTime;

/// Convert a click in page coordinates to an action via the grid's bounding rect.
fn dom_hit_test(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<u16> {
    let document = web_sys::window()?.document()?;

    // DomBackend renders the grid into a <div> directly under <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let action = cs.hit_test_pixel(
        mouse_x as f64 - rect.left(),
        mouse_y as f64 - rect.top(),
        rect.width(),
        rect.height(),
    );
    log::debug!(
        "click at ({mouse_x}, {mouse_y}) -> {action:?} ({} targets)",
        cs.targets.len()
    );
    action
}

/// Monotonic milliseconds, falling back to wall-clock time.
fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map_or_else(js_sys::Date::now, |p| p.now())
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    logging::init();
    let config = GameConfig::load();
    logging::set_level(config.debug);

    let catalog = Catalog::builtin().map_err(|e| {
        log::error!("{e}");
        io::Error::new(io::ErrorKind::InvalidData, e)
    })?;
    log::info!("loaded {} upgrades", catalog.len());

    let game: Rc<RefCell<dyn Game>> = Rc::new(RefCell::new(ClickerGame::new(
        config.clone(),
        catalog,
        storage::default_store(),
    )));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    // Mouse/touch click handler
    terminal.on_mouse_event({
        let game = game.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }

            let action = {
                let cs = click_state.borrow();
                if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                    return;
                }
                dom_hit_test(mouse_event.x, mouse_event.y, &cs)
            };

            if let Some(id) = action {
                game.borrow_mut().handle_input(&InputEvent::Click(id));
            }
        }
    });

    // Keyboard handler
    terminal.on_key_event({
        let game = game.clone();
        move |key_event| {
            let key = match key_event.code {
                KeyCode::Char(c) => c,
                KeyCode::Enter => ' ',
                _ => return,
            };
            game.borrow_mut().handle_input(&InputEvent::Key(key));
        }
    });

    let mut clock = GameTime::new(config.ticks_per_second);
    terminal.draw_web({
        let click_state = click_state.clone();
        move |f| {
            let ticks = clock.update(now_ms());
            if ticks > 0 {
                game.borrow_mut().tick(ticks);
            }

            let size = f.area();
            click_state.borrow_mut().begin_frame(size);

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(10)])
                .split(size);

            render_title(f, chunks[0]);
            game.borrow().render(f, chunks[1], &click_state);
        }
    });

    Ok(())
}

fn render_title(f: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(Span::styled(
        i18n::t("title"),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    )
    .alignment(Alignment::Center);
    f.render_widget(title, area);
}
