//! UDP entrypoint: one socket shared by every connected client, one
//! tokio task per active room. `rtype-engine` owns the simulation;
//! this binary only owns the network reactor around it.

mod registry;
mod room;
mod wire;

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use tokio::net::UdpSocket;

use rtype_engine::prelude::*;
use rtype_protocol::prelude::*;

use registry::ClientRegistry;

const MAX_DATAGRAM_SIZE: usize = 2048;

struct Server {
    socket: Arc<UdpSocket>,
    instances: Arc<GameInstanceManager>,
    registry: Arc<ClientRegistry>,
    config: ServerConfig,
    active_rooms: Arc<Mutex<HashSet<String>>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = load_config()?;
    if !config.screen_dims_match_compiled() {
        tracing::warn!(
            configured_width = config.screen_width,
            configured_height = config.screen_height,
            "config screen dimensions differ from the compiled-in world bounds; collision math still uses the compiled bounds"
        );
    }
    let socket = UdpSocket::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, tick_rate_hz = config.tick_rate_hz, "rtype-server listening");

    let room_settings = RoomSettings::from(&config);
    let server = Server {
        socket: Arc::new(socket),
        instances: Arc::new(GameInstanceManager::new(config.max_players_per_room, room_settings)),
        registry: Arc::new(ClientRegistry::new()),
        config,
        active_rooms: Arc::new(Mutex::new(HashSet::new())),
    };

    run(server).await
}

fn load_config() -> anyhow::Result<ServerConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(ServerConfig::default());
    };
    let contents = std::fs::read_to_string(&path).with_context(|| format!("reading config file {path}"))?;
    ServerConfig::load_from_toml(&contents).with_context(|| format!("parsing config file {path}"))
}

async fn run(server: Server) -> anyhow::Result<()> {
    let mut buf = [0u8; MAX_DATAGRAM_SIZE];
    loop {
        let (len, addr) = server.socket.recv_from(&mut buf).await?;
        let (header, payload) = match decode_frame(&buf[..len]) {
            Ok(v) => v,
            Err(err) => {
                tracing::debug!(%addr, %err, "dropping malformed datagram");
                continue;
            }
        };
        let Ok(packet_type) = PacketType::from_u16(header.packet_type) else {
            tracing::debug!(%addr, "dropping unknown packet type");
            continue;
        };

        if let Err(err) = dispatch(&server, addr, packet_type, &payload).await {
            tracing::debug!(%addr, ?packet_type, %err, "dropping malformed payload");
        }
    }
}

async fn dispatch(
    server: &Server,
    addr: SocketAddr,
    packet_type: PacketType,
    payload: &[u8],
) -> Result<(), ProtocolError> {
    match packet_type {
        PacketType::Connect => {
            let connect = Connect::from_bytes(payload)?;
            handle_connect(server, addr, connect).await;
        }
        PacketType::Disconnect => {
            handle_disconnect(server, addr);
        }
        PacketType::PlayerInput => {
            let input = PlayerInput::from_bytes(payload)?;
            handle_input(server, addr, input);
        }
        PacketType::Ping => {
            let ping = Ping::from_bytes(payload)?;
            handle_ping(server, addr, ping).await;
        }
        // Server-to-client packets never arrive inbound; a misbehaving or
        // confused peer sending one is simply ignored.
        PacketType::Accept
        | PacketType::Reject
        | PacketType::GameState
        | PacketType::Spawn
        | PacketType::Despawn
        | PacketType::Event
        | PacketType::Pong => {}
    }
    Ok(())
}

async fn handle_connect(server: &Server, addr: SocketAddr, connect: Connect) {
    if connect.name().is_empty() {
        send_reject(server, addr, RejectReason::InvalidName).await;
        return;
    }

    let room_code = match find_room_with_capacity(server) {
        Some(code) => code,
        None => format!("room-{}", server.registry.allocate_player_id()),
    };
    let room = server.instances.get_or_create_instance(&room_code, rand::random());
    maybe_spawn_room_task(server, &room_code, room.clone());

    let player_id = server.registry.allocate_player_id();
    let mut world = room.lock().expect("room mutex poisoned");
    match world.add_player(player_id) {
        Ok(_) => {
            drop(world);
            server.registry.register(addr, player_id, room_code.clone());
            tracing::info!(%addr, player_id, %room_code, "player connected");
            let accept = Accept {
                player_id,
                server_tick: 0,
                tick_rate: server.config.tick_rate_hz as f32,
            };
            send(server, addr, PacketType::Accept, accept.to_bytes()).await;
        }
        Err(_room_full) => {
            drop(world);
            send_reject(server, addr, RejectReason::RoomFull).await;
        }
    }
}

fn handle_disconnect(server: &Server, addr: SocketAddr) {
    let Some((player_id, room_code)) = server.registry.remove(&addr) else {
        return;
    };
    if let Ok(room) = server.instances.get_instance(&room_code) {
        room.lock().expect("room mutex poisoned").remove_player(player_id);
    }
    tracing::info!(%addr, player_id, %room_code, "player disconnected");
}

fn handle_input(server: &Server, addr: SocketAddr, input: PlayerInput) {
    let Some((room_code, player_id)) = server.registry.room_and_player(&addr) else {
        return;
    };
    let Ok(room) = server.instances.get_instance(&room_code) else {
        return;
    };
    let (pressed, released) = server.registry.take_edges(&addr, input.input_keys);

    let mut world = room.lock().expect("room mutex poisoned");
    world.apply_player_input(
        player_id,
        input.client_tick,
        input.key(INPUT_UP),
        input.key(INPUT_DOWN),
        input.key(INPUT_LEFT),
        input.key(INPUT_RIGHT),
    );
    if input.key(INPUT_SHOOT) {
        world.request_shoot(player_id);
    }
    if pressed & INPUT_CHARGE != 0 {
        world.request_charge_start(player_id);
    }
    if released & INPUT_CHARGE != 0 {
        world.request_charge_release(player_id);
    }
    if pressed & INPUT_SWITCH_WEAPON != 0 {
        world.request_switch_weapon(player_id, 1);
    }
}

async fn handle_ping(server: &Server, addr: SocketAddr, ping: Ping) {
    send(server, addr, PacketType::Pong, ping.to_bytes()).await;
}

async fn send_reject(server: &Server, addr: SocketAddr, reason: RejectReason) {
    send(server, addr, PacketType::Reject, Reject { reason_code: reason }.to_bytes()).await;
}

async fn send(server: &Server, addr: SocketAddr, packet_type: PacketType, payload: Vec<u8>) {
    let frame = wire::encode(packet_type, 0, payload);
    let _ = server.socket.send_to(&frame, addr).await;
}

fn find_room_with_capacity(server: &Server) -> Option<String> {
    server.instances.get_active_room_codes().into_iter().find(|code| {
        server
            .instances
            .get_instance(code)
            .map(|room| room.lock().expect("room mutex poisoned").player_count() < server.config.max_players_per_room as usize)
            .unwrap_or(false)
    })
}

fn maybe_spawn_room_task(server: &Server, room_code: &str, world: Arc<Mutex<GameWorld>>) {
    let mut active = server.active_rooms.lock().expect("active room set mutex poisoned");
    if !active.insert(room_code.to_string()) {
        return;
    }
    drop(active);

    tokio::spawn(room::run(
        room_code.to_string(),
        world,
        server.socket.clone(),
        server.registry.clone(),
        server.instances.clone(),
        server.config.clone(),
        server.active_rooms.clone(),
    ));
}
