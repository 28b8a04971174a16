use crate::errors::Result;
use crate::http::ApiClient;
use crate::model::ReceivedPacket;
use crate::render::{self, CHANNELS};
use crate::services::latest::LatestService;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

/// Latest-reading page: one-shot fetch, or watch mode polling until Ctrl-C.
pub async fn run(api: ApiClient, watch: bool, period: Duration) -> Result<()> {
    let service = LatestService::new(api);

    if !watch {
        let packet = service.latest().await?;
        println!("{}", render_packet(&packet));
        return Ok(());
    }

    let (tx, mut rx) = mpsc::channel(1);
    let poller = {
        let service = service.clone();
        tokio::spawn(async move {
            service.poll(period, tx).await;
        })
    };

    loop {
        tokio::select! {
            maybe_packet = rx.recv() => match maybe_packet {
                Some(packet) => {
                    // Each delivery fully replaces the previous view.
                    print!("\x1b[2J\x1b[H");
                    println!("{}", render_packet(&packet));
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("stopping watch");
                break;
            }
        }
    }

    drop(rx);
    poller.abort();
    Ok(())
}

fn render_packet(packet: &ReceivedPacket) -> String {
    let mut out = String::new();
    out.push_str(&render::page_shell("Latest reading"));
    out.push('\n');

    out.push_str(&format!(
        "  Time    {}\n",
        packet.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!(
        "  Signal  RSSI {:.0} dBm, SNR {:.1} dB\n",
        packet.rssi_dbm, packet.snr_db
    ));
    out.push('\n');

    if packet.error {
        out.push_str(&format!(
            "  Decode error: {}\n",
            packet.error_type.as_deref().unwrap_or("unknown")
        ));
        if let Some(raw_hex) = &packet.raw_hex {
            out.push_str(&format!("  Raw payload:  {}\n", raw_hex));
        }
        return out;
    }

    match &packet.sensor_data {
        Some(data) => {
            for meta in CHANNELS {
                if let Some(value) = data.value(meta.key) {
                    out.push_str(&format!(
                        "  {:<16} {:>9.1} {}\n",
                        meta.label, value, meta.unit
                    ));
                }
            }
        }
        None => out.push_str("  (no sensor data in packet)\n"),
    }

    out
}
