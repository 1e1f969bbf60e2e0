#[cfg(all(feature = "live-client", feature = "cairo-backend"))]
fn main() {
    use std::fs::File;
    use std::time::{Duration, Instant};

    use cems_chart::api::{ChartController, ControllerConfig};
    use cems_chart::core::CanvasSurface;
    use cems_chart::render::CairoRenderer;
    use cems_chart::transport::{
        HttpHistoryClient, HttpHistoryConfig, StreamingTransport, TransportConfig, WebSocketChannel,
    };

    let _ = cems_chart::telemetry::init_default_tracing();

    let ws_url = std::env::var("CEMS_WS_URL").unwrap_or_else(|_| "ws://127.0.0.1:8000/ws/data".to_owned());
    let api_url =
        std::env::var("CEMS_API_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_owned());
    let run_for = std::env::var("CEMS_RUN_SECONDS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(60);

    let history = match HttpHistoryClient::new(HttpHistoryConfig {
        base_url: api_url,
        ..HttpHistoryConfig::default()
    }) {
        Ok(client) => client,
        Err(err) => {
            eprintln!("failed to build history client: {err}");
            return;
        }
    };
    let mut controller = match ChartController::new(ControllerConfig::default(), history) {
        Ok(controller) => controller,
        Err(err) => {
            eprintln!("invalid controller config: {err}");
            return;
        }
    };
    controller.declare_default_parameters();
    let names: Vec<String> = controller
        .series_iter()
        .map(|series| series.spec.name.clone())
        .collect();
    for name in &names {
        let renderer = match CairoRenderer::new(600, 300) {
            Ok(renderer) => renderer,
            Err(err) => {
                eprintln!("failed to create renderer: {err}");
                return;
            }
        };
        if let Err(err) = controller.attach_canvas(name, CanvasSurface::default(), renderer) {
            eprintln!("failed to attach {name}: {err}");
        }
    }

    let now_ms = || chrono::Utc::now().timestamp_millis();
    controller.start_live(now_ms());
    let mut transport = StreamingTransport::new(WebSocketChannel::new(ws_url), TransportConfig::default());
    transport.connect(now_ms());

    let started = Instant::now();
    while started.elapsed() < Duration::from_secs(run_for) {
        let now = now_ms();
        controller.pump(&mut transport, now);
        controller.tick(now);
        if let Err(err) = controller.render_dirty() {
            eprintln!("render error: {err}");
        }
        let status = controller.status();
        println!(
            "{:?} online={} points={} notice={:?}",
            status.connection,
            status.data_source_online,
            status.total_points,
            status.notice.map(|notice| notice.message()),
        );
        std::thread::sleep(Duration::from_millis(500));
    }
    transport.dispose();

    for name in &names {
        let Some(canvas) = controller.canvas(name) else {
            continue;
        };
        let path = std::env::temp_dir().join(format!("cems_{name}.png"));
        let written = File::create(&path)
            .map_err(|err| err.to_string())
            .and_then(|mut file| {
                canvas
                    .renderer()
                    .surface()
                    .write_to_png(&mut file)
                    .map_err(|err| err.to_string())
            });
        match written {
            Ok(()) => println!("wrote {}", path.display()),
            Err(err) => eprintln!("failed to write {}: {err}", path.display()),
        }
    }
}

#[cfg(not(all(feature = "live-client", feature = "cairo-backend")))]
fn main() {
    println!("run with: cargo run --features live-client,cairo-backend,telemetry --example live_monitor");
}
