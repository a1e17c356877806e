use leptos::html::Canvas;
use leptos::*;
use std::rc::Rc;
use std::str::FromStr;
use strum::IntoEnumIterator;

use crate::{
    application::{
        coordinator::{Command, DashboardCoordinator},
        use_cases::{FetchRequest, PriceAcquisition, recompute, refetch},
    },
    domain::{
        chart::ReturnsChart,
        errors::AppError,
        events::{DashboardEvent, DomainEvent, MarketDataEvent},
        logging::{LogComponent, LogEntry, Logger, get_logger},
        market_data::{PeriodPreset, PriceField, PriceTable, parse_date},
    },
    global_state::{StatusLine, loading, log_lines, log_paused, push_log_line, status_line},
    infrastructure::{
        config::AppConfig, http::YahooChartClient, rendering::CanvasRenderer,
        services::ConsoleLogger,
    },
    time_utils::{format_input_date, today},
};

/// Bridge logger: console output plus the in-page debug console
pub struct LeptosLogger {
    console: ConsoleLogger,
}

impl LeptosLogger {
    pub fn new(console: ConsoleLogger) -> Self {
        Self { console }
    }
}

impl Logger for LeptosLogger {
    fn log(&self, entry: LogEntry) {
        if entry.level < self.console.min_level() {
            return;
        }
        push_log_line(entry.format_line());
        self.console.log(entry);
    }
}

fn announce(event: MarketDataEvent) {
    let detail = match &event {
        MarketDataEvent::PricesLoaded { symbols, rows, from_cache } => format!(
            "{} symbol(s), {} rows{}",
            symbols.len(),
            rows,
            if *from_cache { " (cached)" } else { "" }
        ),
        MarketDataEvent::LoadFailed { kind, message } => format!("[{}] {}", kind, message),
    };
    get_logger().info(
        LogComponent::Presentation("App"),
        &format!("{}: {}", event.event_type(), detail),
    );
}

fn report(error: &AppError) {
    get_logger().warn(
        LogComponent::Presentation("App"),
        &format!("[{}] {}", error.kind(), error),
    );
    status_line().set(StatusLine::Error(error.to_string()));
}

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    let coordinator = create_rw_signal(DashboardCoordinator::new(
        today(),
        &config.default_tickers,
        config.default_period,
    ));
    let acquisition = store_value(Rc::new(
        PriceAcquisition::new(YahooChartClient::new(config.base_url.clone()))
            .with_batch_separator(config.batch_separator),
    ));
    let table = create_rw_signal::<Option<Rc<PriceTable>>>(None);
    let chart = create_rw_signal::<Option<ReturnsChart>>(None);
    // responses of superseded requests are dropped
    let request_seq = store_value(0u64);

    let show = move |command: Command| {
        let Command::Recompute { field, start, end } = command else {
            return;
        };
        let Some(loaded) = table.get_untracked() else {
            return;
        };
        match recompute(&loaded, field, start, end) {
            Ok(returns_chart) => {
                chart.set(Some(returns_chart));
                status_line().set(StatusLine::Info(format!(
                    "{} to {}",
                    format_input_date(start),
                    format_input_date(end)
                )));
            }
            Err(e) => {
                chart.set(None);
                report(&e);
            }
        }
    };

    let load = move |request: FetchRequest| {
        request_seq.update_value(|seq| *seq += 1);
        let seq = request_seq.get_value();
        let acquisition = acquisition.get_value();
        loading().set(true);
        status_line().set(StatusLine::Info("Loading prices...".to_string()));

        spawn_local(async move {
            let result = refetch(&acquisition, &request).await;
            if request_seq.get_value() != seq {
                return;
            }
            loading().set(false);
            match result {
                Ok(outcome) => {
                    announce(MarketDataEvent::PricesLoaded {
                        symbols: outcome.table.symbols(),
                        rows: outcome.table.row_count(),
                        from_cache: outcome.from_cache,
                    });
                    let command = coordinator
                        .try_update(|c| c.on_table_loaded(&outcome.table))
                        .unwrap_or(Command::Idle);
                    table.set(Some(outcome.table));
                    show(command);
                }
                Err(e) => {
                    announce(MarketDataEvent::LoadFailed {
                        kind: e.kind(),
                        message: e.to_string(),
                    });
                    coordinator.update(DashboardCoordinator::on_load_failed);
                    table.set(None);
                    chart.set(None);
                    report(&e);
                }
            }
        });
    };

    let dispatch = move |event: DashboardEvent| match coordinator.try_update(|c| c.dispatch(event)) {
        Some(Ok(Command::Refetch(request))) => load(request),
        Some(Ok(command)) => show(command),
        Some(Err(e)) => report(&e),
        None => {}
    };

    match coordinator.with_untracked(DashboardCoordinator::fetch_request) {
        Ok(request) => load(request),
        Err(e) => report(&e),
    }

    view! {
        <style>{STYLE}</style>
        <div class="returns-app">
            <Sidebar coordinator=coordinator dispatch=Callback::new(dispatch) />
            <main class="main">
                <ChartCanvas chart=chart width=config.chart_width height=config.chart_height />
                <WindowSlider coordinator=coordinator dispatch=Callback::new(dispatch) />
                <StatusBar />
                <DebugConsole />
            </main>
        </div>
    }
}

#[component]
fn Sidebar(coordinator: RwSignal<DashboardCoordinator>, dispatch: Callback<DashboardEvent>) -> impl IntoView {
    let on_date = move |value: String, start: bool| match parse_date(&value) {
        Ok(date) if start => dispatch.call(DashboardEvent::StartDatePicked(date)),
        Ok(date) => dispatch.call(DashboardEvent::EndDatePicked(date)),
        Err(e) => report(&AppError::from(e)),
    };

    view! {
        <aside class="sidebar">
            <h2>"Stock Returns"</h2>
            <label>"Tickers"</label>
            <input
                type="text"
                prop:value=move || coordinator.with(|c| c.tickers().to_string())
                on:change=move |ev| dispatch.call(DashboardEvent::TickersEdited(event_target_value(&ev)))
            />
            <label>"Period"</label>
            <select
                prop:value=move || coordinator.with(|c| c.period().to_string())
                on:change=move |ev| match PeriodPreset::parse(&event_target_value(&ev)) {
                    Ok(period) => dispatch.call(DashboardEvent::PeriodSelected(period)),
                    Err(e) => report(&AppError::from(e)),
                }
            >
                {PeriodPreset::iter()
                    .map(|p| view! { <option value=p.to_string()>{p.to_string()}</option> })
                    .collect_view()}
            </select>
            <label>"Start date"</label>
            <input
                type="date"
                prop:value=move || coordinator.with(|c| format_input_date(c.start()))
                on:change=move |ev| on_date(event_target_value(&ev), true)
            />
            <label>"End date"</label>
            <input
                type="date"
                prop:value=move || coordinator.with(|c| format_input_date(c.end()))
                on:change=move |ev| on_date(event_target_value(&ev), false)
            />
            <label>"Price field"</label>
            <select
                prop:value=move || coordinator.with(|c| c.field().to_string())
                on:change=move |ev| {
                    if let Ok(field) = PriceField::from_str(&event_target_value(&ev)) {
                        dispatch.call(DashboardEvent::FieldSelected(field));
                    }
                }
            >
                {PriceField::iter()
                    .filter(|f| *f != PriceField::Volume)
                    .map(|f| view! { <option value=f.to_string()>{f.to_string()}</option> })
                    .collect_view()}
            </select>
        </aside>
    }
}

#[component]
fn WindowSlider(coordinator: RwSignal<DashboardCoordinator>, dispatch: Callback<DashboardEvent>) -> impl IntoView {
    let handles = move || coordinator.with(|c| c.view().handles());
    let max = move || coordinator.with(|c| c.view().date_count().saturating_sub(1).to_string());
    let label = move |index: usize| coordinator.with(|c| c.view().label_at(index).unwrap_or_default());
    let parse = |value: String| value.parse::<usize>().ok();

    view! {
        <div class="slider" class:hidden=move || coordinator.with(|c| c.view().is_empty())>
            <span class="slider-label">{move || label(handles().0)}</span>
            <div class="slider-track">
                <input
                    type="range"
                    min="0"
                    max=max
                    prop:value=move || handles().0.to_string()
                    on:input=move |ev| {
                        if let Some(low) = parse(event_target_value(&ev)) {
                            dispatch.call(DashboardEvent::WindowMoved { low, high: handles().1 });
                        }
                    }
                />
                <input
                    type="range"
                    min="0"
                    max=max
                    prop:value=move || handles().1.to_string()
                    on:input=move |ev| {
                        if let Some(high) = parse(event_target_value(&ev)) {
                            dispatch.call(DashboardEvent::WindowMoved { low: handles().0, high });
                        }
                    }
                />
            </div>
            <span class="slider-label">{move || label(handles().1)}</span>
        </div>
    }
}

#[component]
fn ChartCanvas(chart: RwSignal<Option<ReturnsChart>>, width: u32, height: u32) -> impl IntoView {
    let canvas_ref = create_node_ref::<Canvas>();

    create_effect(move |_| {
        let current = chart.get();
        let status = status_line().get();
        let is_loading = loading().get();
        let Some(canvas) = canvas_ref.get() else {
            return;
        };

        let renderer = CanvasRenderer::new(width, height);
        let result = match (&current, is_loading) {
            (Some(returns_chart), _) => renderer.render_chart(&canvas, returns_chart),
            (None, true) => renderer.render_message(&canvas, "Loading..."),
            (None, false) => renderer.render_message(&canvas, status.text()),
        };
        if let Err(e) = result {
            get_logger().error(
                LogComponent::Presentation("ChartCanvas"),
                &format!("render failed: {:?}", e),
            );
        }
    });

    view! {
        <canvas node_ref=canvas_ref class="chart-canvas" width=width height=height />
    }
}

#[component]
fn StatusBar() -> impl IntoView {
    let status = status_line();
    view! {
        <div class="status" class:error=move || status.with(StatusLine::is_error)>
            {move || status.with(|s| s.text().to_string())}
        </div>
    }
}

#[component]
fn DebugConsole() -> impl IntoView {
    let logs = log_lines();
    let is_paused = log_paused();

    view! {
        <div class="debug-console">
            <div class="debug-header">
                <span>"Log"</span>
                <button class="debug-btn" on:click=move |_| is_paused.update(|p| *p = !*p)>
                    {move || if is_paused.get() { "Resume" } else { "Pause" }}
                </button>
                <button class="debug-btn" on:click=move |_| logs.set(Vec::new())>
                    "Clear"
                </button>
            </div>
            <div class="debug-log">
                <For
                    each=move || logs.get().into_iter().enumerate()
                    key=|(i, line)| (*i, line.clone())
                    children=move |(_, line)| view! { <div class="log-line">{line}</div> }
                />
            </div>
        </div>
    }
}

const STYLE: &str = r#"
.returns-app {
    font-family: -apple-system, BlinkMacSystemFont, sans-serif;
    display: flex;
    min-height: 100vh;
    background: #121212;
    color: #e0e0e0;
}
.sidebar {
    width: 240px;
    padding: 20px;
    display: flex;
    flex-direction: column;
    gap: 6px;
    background: #1e1e1e;
}
.sidebar input, .sidebar select {
    padding: 6px;
    margin-bottom: 10px;
    background: #2a2a2a;
    color: #e0e0e0;
    border: 1px solid #3a3a3a;
    border-radius: 4px;
}
.main {
    flex: 1;
    padding: 20px;
}
.chart-canvas {
    border-radius: 8px;
}
.slider {
    display: flex;
    align-items: center;
    gap: 12px;
    margin: 12px 0;
}
.slider.hidden {
    visibility: hidden;
}
.slider-track {
    position: relative;
    flex: 1;
    display: flex;
    flex-direction: column;
}
.slider-label {
    font-family: monospace;
    min-width: 70px;
}
.status {
    padding: 8px;
    border-radius: 4px;
    background: #1e2a1e;
}
.status.error {
    background: #3a1e1e;
    color: #ff8080;
}
.debug-console {
    margin-top: 16px;
    background: #0d0d0d;
    border-radius: 6px;
    font-family: monospace;
    font-size: 11px;
}
.debug-header {
    display: flex;
    gap: 8px;
    align-items: center;
    padding: 6px 10px;
    border-bottom: 1px solid #2a2a2a;
}
.debug-btn {
    background: #2a2a2a;
    color: #e0e0e0;
    border: none;
    padding: 2px 8px;
    border-radius: 3px;
    cursor: pointer;
}
.debug-log {
    max-height: 180px;
    overflow-y: auto;
    padding: 6px 10px;
}
.log-line {
    margin: 1px 0;
}
"#;
