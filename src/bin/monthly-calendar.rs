//! An interactive monthly calendar in the terminal
//!
//! Usage: `monthly-calendar <settings.json>` (see `demos/settings.json`)

use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;

use sheet_calendar::calendar::render::{render_month, Palette};
use sheet_calendar::completion::rest::RestCompletionStore;
use sheet_calendar::config::Settings;
use sheet_calendar::poller::Poller;
use sheet_calendar::traits::CompletionStore;
use sheet_calendar::CalendarController;

const HELP: &str = "Commands: n(ext), p(rev), t(oday), all, cat <category>, done <number>, r(eload), q(uit)";

#[tokio::main]
async fn main() {
    env_logger::init();

    let path = match std::env::args().nth(1) {
        None => {
            eprintln!("Usage: monthly-calendar <settings.json>");
            std::process::exit(2);
        },
        Some(p) => PathBuf::from(p),
    };
    let settings = match Settings::from_file(&path) {
        Err(err) => {
            eprintln!("Unable to read settings from {:?}: {}", path, err);
            std::process::exit(1);
        },
        Ok(s) => s,
    };

    let rest_store = settings.completion_store_url.clone().map(|url| Arc::new(RestCompletionStore::new(url)));
    if let Some(store) = &rest_store {
        if let Err(err) = store.refresh().await {
            log::warn!("Unable to read the completion values: {}", err);
        }
    }
    let store = rest_store.clone().map(|s| s as Arc<dyn CompletionStore>);
    let palette = Palette::from_sources(&settings.sources);

    let mut controller = CalendarController::from_settings(&settings, store);
    controller.load().await;
    let controller = Arc::new(Mutex::new(controller));

    show(&mut *controller.lock().await, &palette);
    println!("{}", HELP);

    if let Some(poller) = Poller::from_settings(&settings) {
        log::info!("Polling every {:?}", poller.interval());
        let palette = palette.clone();
        tokio::spawn(poller.run(Arc::clone(&controller), move |controller| {
            show(controller, &palette);
        }));
    }

    if let (Some(rest), Some(interval)) = (rest_store, settings.completion_refresh_interval()) {
        log::info!("Refreshing completion values every {:?}", interval);
        let controller = Arc::clone(&controller);
        let palette = palette.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let changes = match rest.refresh().await {
                    Ok(n) => n,
                    Err(err) => {
                        log::warn!("Unable to refresh the completion values: {}", err);
                        0
                    },
                };
                if changes > 0 {
                    show(&mut *controller.lock().await, &palette);
                }
            }
        });
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Err(err) => {
                log::error!("Unable to read stdin: {}", err);
                break;
            },
            Ok(None) => break,
            Ok(Some(line)) => line,
        };

        let line = line.trim();
        let (command, argument) = match line.split_once(' ') {
            None => (line, ""),
            Some((c, a)) => (c, a.trim()),
        };

        match command {
            "" => continue,
            "q" | "quit" => break,
            "n" | "next" => controller.lock().await.next_month(),
            "p" | "prev" => controller.lock().await.previous_month(),
            "t" | "today" => controller.lock().await.go_today(),
            "all" => controller.lock().await.show_all(),
            "cat" => {
                let filtered = controller.lock().await.filter_by(argument).map_err(|err| err.to_string());
                if let Err(err) = filtered {
                    println!("{}", err);
                    continue;
                }
            },
            "r" | "reload" => {
                // The calendar stays usable while the sources are fetched
                let aggregator = controller.lock().await.aggregator();
                println!("Loading events...");
                let result = aggregator.load().await;
                controller.lock().await.apply_load(result);
            },
            "done" => {
                let number = match argument.parse::<usize>() {
                    Err(_) => {
                        println!("Usage: done <number>");
                        continue;
                    },
                    Ok(n) => n,
                };
                // Numbers refer to the last rendered grid, which may have been rendered in the background
                let pending = controller.lock().await.start_toggle_item(number).map_err(|err| err.to_string());
                match pending {
                    Err(err) => println!("{}", err),
                    Ok(pending) => {
                        if let Err(err) = pending.commit().await {
                            println!("{}", err);
                        }
                    },
                }
            },
            _ => {
                println!("{}", HELP);
                continue;
            },
        }
        show(&mut *controller.lock().await, &palette);
    }
}

/// Render the current month, and print it along with the status line
fn show(controller: &mut CalendarController, palette: &Palette) {
    let grid = controller.render();
    let categories: Vec<String> = controller.filter().pills().iter()
        .map(|pill| match pill.is_active() {
            true => format!("<{}>", pill.label()),
            false => pill.label().to_string(),
        })
        .collect();

    println!("{}", render_month(&grid, palette));
    if categories.is_empty() == false {
        let all = if controller.filter().is_all() { "<all>" } else { "all" };
        println!("Categories: {} {}", all, categories.join(" "));
    }
    println!("{}", controller.status());
}
