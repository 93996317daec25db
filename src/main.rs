mod config;
mod error;
mod i18n;
mod input;
mod logging;
mod mango;
mod net;
mod time;
mod update;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::VisibilityState;

use i18n::Lang;
use input::{cell_at, ClickMap, InputEvent};
use mango::session::{AuthProvider, HostAuth, Session, UserAuth};
use mango::sync::{self, RealtimeDbStore};
use mango::{Effect, MangoGame, KEY_ESC, KEY_TAB};
use time::FrameClock;
use update::{GitHubReleases, UpdateFeed};

type SharedGame = Rc<RefCell<MangoGame>>;
type Remote = Option<Rc<RealtimeDbStore>>;

/// Map a pointer position to a terminal cell using the grid container's box.
fn dom_pixel_to_cell(mouse_x: u32, mouse_y: u32, map: &ClickMap) -> Option<(u16, u16)> {
    let document = web_sys::window()?.document()?;
    // DomBackend renders the grid as a <div> directly inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();
    cell_at(
        mouse_x as f64 - rect.left(),
        mouse_y as f64 - rect.top(),
        rect.width(),
        rect.height(),
        map.cols,
        map.rows,
    )
}

fn frame_time_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

fn dispatch(game: &SharedGame, remote: &Remote, event: InputEvent) {
    let effect = game.borrow_mut().handle_input(&event, time::now_ms());
    if let Some(effect) = effect {
        run_effect(game, remote, effect);
    }
}

fn run_effect(game: &SharedGame, remote: &Remote, effect: Effect) {
    match effect {
        Effect::PushRemote { user, data, today } => {
            let Some(remote) = remote.clone() else {
                return;
            };
            let game = game.clone();
            spawn_local(async move {
                let result = sync::save_remote(remote.as_ref(), &user, &data, today).await;
                game.borrow_mut().on_remote_saved(today, result);
            });
        }
        Effect::SignIn => {
            let game = game.clone();
            let remote = remote.clone();
            spawn_local(async move {
                let result = HostAuth.sign_in().await;
                let user = game.borrow_mut().on_signed_in(result);
                if let (Some(user), Some(remote)) = (user, remote) {
                    load_progress(&game, &remote, user).await;
                }
            });
        }
        Effect::SignOut => HostAuth.sign_out(),
        Effect::DownloadUpdate(info) => {
            let game = game.clone();
            spawn_local(async move {
                let mut report = |percent: Option<u8>| {
                    log::debug!("Mango Clicker: update download progress {percent:?}");
                };
                let result = GitHubReleases::new()
                    .download_and_install(&info.url, &mut report)
                    .await;
                game.borrow_mut().on_update_started(result);
            });
        }
    }
}

/// Push the day's remote save when the tab is hidden or closed.
fn watch_page_visibility(game: &SharedGame, remote: &Remote) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let handler = Closure::<dyn FnMut()>::new({
        let game = game.clone();
        let remote = remote.clone();
        let document = document.clone();
        move || {
            if document.visibility_state() != VisibilityState::Hidden {
                return;
            }
            let effect = game.borrow_mut().on_page_hidden(time::today());
            if let Some(effect) = effect {
                run_effect(&game, &remote, effect);
            }
        }
    });
    if let Err(e) =
        document.add_event_listener_with_callback("visibilitychange", handler.as_ref().unchecked_ref())
    {
        log::warn!("Mango Clicker: cannot watch page visibility: {e:?}");
    }
    // The listener lives as long as the page.
    handler.forget();
}

/// Resolve local against remote progress for `user` and adopt the winner.
async fn load_progress(game: &SharedGame, remote: &RealtimeDbStore, user: UserAuth) {
    let local = game.borrow().state.data.clone();
    let resolved = sync::resolve_session_start(local, remote, Some(&user)).await;
    game.borrow_mut().apply_resolved(resolved);
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();
    logging::init();

    let mut store = mango::save::open_store();
    let session = Session::start(store.as_mut(), HostAuth.current_user());
    let remote: Remote = config::REMOTE_BASE_URL.map(|url| Rc::new(RealtimeDbStore::new(url)));
    let signed_in_user = session.user().cloned();
    let first_launch = session.is_first_launch();

    let game = Rc::new(RefCell::new(MangoGame::new(
        store,
        session,
        Lang::detect(),
        remote.is_some(),
    )));
    let click_map = Rc::new(RefCell::new(ClickMap::new()));

    log::info!(
        "Mango Clicker {} started (cloud saves {}, first launch: {first_launch})",
        config::APP_VERSION,
        if remote.is_some() { "on" } else { "off" }
    );

    if let (Some(user), Some(remote)) = (signed_in_user, remote.clone()) {
        let game = game.clone();
        spawn_local(async move {
            load_progress(&game, &remote, user).await;
        });
    }

    if remote.is_some() {
        watch_page_visibility(&game, &remote);
    }

    spawn_local({
        let game = game.clone();
        async move {
            let result = GitHubReleases::new().check_for_update().await;
            game.borrow_mut().on_update_checked(result);
        }
    });

    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    terminal.on_mouse_event({
        let game = game.clone();
        let remote = remote.clone();
        let click_map = click_map.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed || mouse_event.button != MouseButton::Left {
                return;
            }
            let action = {
                let map = click_map.borrow();
                dom_pixel_to_cell(mouse_event.x, mouse_event.y, &map)
                    .and_then(|(col, row)| map.hit(col, row))
            };
            if let Some(action) = action {
                dispatch(&game, &remote, InputEvent::Click(action));
            }
        }
    });

    terminal.on_key_event({
        let game = game.clone();
        let remote = remote.clone();
        move |key_event| {
            let key = match key_event.code {
                KeyCode::Char(c) => c.to_ascii_lowercase(),
                KeyCode::Tab => KEY_TAB,
                KeyCode::Esc => KEY_ESC,
                _ => return,
            };
            dispatch(&game, &remote, InputEvent::Key(key));
        }
    });

    let mut clock = FrameClock::new(config::TICKS_PER_SEC);
    terminal.draw_web(move |f| {
        let ticks = clock.advance(frame_time_ms());
        game.borrow_mut().tick(ticks);

        let area = f.area();
        let mut map = click_map.borrow_mut();
        map.begin_frame(area.width, area.height);
        mango::render::render(&game.borrow(), time::now_ms(), f, area, &mut map);
    });

    Ok(())
}
