use crate::bridge::model::{BridgeModel, EncodeReply};
use log::{error, info};
use serde_json::{json, Value};
use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use vglntcore::processing::{apply_scale, encode_sequence};
use vglntcore::{EncoderResult, ScalerState};
use warp::{http::StatusCode, Filter, Reply};

fn bridge_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

type SharedModel = Arc<RwLock<BridgeModel>>;

/// Encodes one request's frames, scaling them when a fitted scaler exists.
pub fn encode_request(frames: &[Value], scaler: Option<&ScalerState>) -> EncoderResult<EncodeReply> {
    let sequence = encode_sequence("request", frames)?;
    let matrix = sequence.to_matrix();
    let (rows, width) = matrix.dim();

    let features = match scaler {
        Some(state) => {
            let tensor = matrix.into_shape((1, rows, width)).map_err(|err| {
                vglntcore::EncoderError::InvalidInput(format!("reshaping request: {err}"))
            })?;
            let scaled = apply_scale(&tensor, state)?;
            scaled
                .outer_iter()
                .flat_map(|video| {
                    video
                        .outer_iter()
                        .map(|row| row.to_vec())
                        .collect::<Vec<_>>()
                })
                .collect()
        }
        None => matrix.outer_iter().map(|row| row.to_vec()).collect(),
    };

    Ok(EncodeReply {
        frames: rows,
        scaled: scaler.is_some(),
        features,
    })
}

fn handle_encode(frames: Vec<Value>, state: SharedModel) -> warp::reply::Response {
    let scaler = state.read().ok().and_then(|model| model.scaler.clone());
    match encode_request(&frames, scaler.as_ref()) {
        Ok(reply) => warp::reply::json(&reply).into_response(),
        Err(err) => {
            error!("encode request rejected: {}", err);
            warp::reply::with_status(
                warp::reply::json(&json!({"error": err.to_string()})),
                StatusCode::UNPROCESSABLE_ENTITY,
            )
            .into_response()
        }
    }
}

/// `GET /summary` and `POST /encode`.
pub fn routes(
    state: SharedModel,
) -> impl Filter<Extract = (warp::reply::Response,), Error = warp::Rejection> + Clone {
    let state_filter = warp::any().map(move || state.clone());

    let summary_route = warp::path("summary")
        .and(warp::get())
        .and(state_filter.clone())
        .map(|state: SharedModel| {
            let summary = state.read().ok().and_then(|model| model.summary.clone());
            warp::reply::json(&summary).into_response()
        });

    let encode_route = warp::path("encode")
        .and(warp::post())
        .and(warp::body::json())
        .and(state_filter)
        .and_then(|frames: Vec<Value>, state: SharedModel| async move {
            Ok::<_, Infallible>(handle_encode(frames, state))
        });

    summary_route.or(encode_route).unify()
}

/// Bridge that hosts the encoding HTTP endpoint for inference-time callers.
pub struct EncodingBridge {
    state: SharedModel,
}

impl EncodingBridge {
    pub fn new(model: BridgeModel) -> Self {
        let state = Arc::new(RwLock::new(model));
        let filter = routes(state.clone());

        thread::spawn(move || {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("failed to build bridge runtime: {}", err);
                    return;
                }
            };
            runtime.block_on(async move {
                warp::serve(filter).run(bridge_bind_address()).await;
            });
        });

        Self { state }
    }

    pub fn publish(&self, model: BridgeModel) {
        if let Ok(mut guard) = self.state.write() {
            *guard = model;
            info!(
                "[bridge] summary available: {}, scaler loaded: {}",
                guard.summary.is_some(),
                guard.scaler.is_some()
            );
        }
    }

    pub fn publish_status(&self, message: &str) {
        info!("[bridge] {}", message);
    }
}
