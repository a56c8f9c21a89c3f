//! strip — random motorcycles on a triangulated 8 x 2 strip.
//!
//! Half of the agents get a random direction and are driven by the straight
//! tracer until they crash; the other half get a random destination in the
//! face of their source.  The run is dumped to `output/strip`.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use mg_agent::{AgentSpec, Tracer};
use mg_core::{AgentId, TraceRng, TracerConfig, Vector3};
use mg_graph::{GraphObserver, MotorcycleGraph, MotorcycleGraphBuilder};
use mg_mesh::{FaceComplex, RandomPointsInMesh, shapes};
use mg_output::{DumpObserver, TrackCsvWriter, TrackWriter};

// ── Constants ─────────────────────────────────────────────────────────────────

const AGENT_COUNT: usize = 40;
const SEED:        u64   = 42;
const STRIP_CELLS: usize = 8;
const OUTPUT_DIR:  &str  = "output/strip";

// ── Observer wrapper to count events ─────────────────────────────────────────

struct CountingObserver<W: TrackWriter> {
    inner:      DumpObserver<W>,
    collisions: usize,
    crashes:    usize,
}

impl<W: TrackWriter> GraphObserver for CountingObserver<W> {
    fn on_initialized<M: FaceComplex, T: Tracer>(&mut self, graph: &MotorcycleGraph<M, T>) {
        self.inner.on_initialized(graph);
    }

    fn on_collision(&mut self, _agent: AgentId, _foreign: AgentId, _time: f64) {
        self.collisions += 1;
    }

    fn on_crash(&mut self, _agent: AgentId, _time: f64) {
        self.crashes += 1;
    }

    fn on_finished<M: FaceComplex, T: Tracer>(&mut self, graph: &MotorcycleGraph<M, T>) {
        self.inner.on_finished(graph);
    }
}

// ── Agents ───────────────────────────────────────────────────────────────────

fn random_agents<M: FaceComplex>(mesh: &M, rng: &mut TraceRng) -> Result<Vec<AgentSpec>> {
    let sampler = RandomPointsInMesh::new(mesh);
    let mut agents = Vec::with_capacity(AGENT_COUNT);
    for i in 0..AGENT_COUNT {
        let source = sampler.sample(rng).context("mesh has no area")?;
        let speed = rng.gen_range(0.5..1.5);
        let spec = if i % 2 == 0 {
            let angle: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
            AgentSpec::from_location(source).towards(Vector3::new(angle.cos(), angle.sin(), 0.0))
        } else {
            // Another point of the same face.
            let mut r1: f64 = rng.gen_range(0.0..1.0);
            let mut r2: f64 = rng.gen_range(0.0..1.0);
            if r1 + r2 > 1.0 {
                (r1, r2) = (1.0 - r1, 1.0 - r2);
            }
            let mut destination = source;
            destination.coords = [1.0 - r1 - r2, r1, r2];
            AgentSpec::from_location(source).to_location(destination)
        };
        agents.push(spec.with_speed(speed).starting_at(rng.gen_range(0.0..0.5)));
    }
    Ok(agents)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== strip — motorcycle graph ===");
    println!("Agents: {AGENT_COUNT}  |  Cells: {STRIP_CELLS} x 2  |  Seed: {SEED}");
    println!();

    // 1. Mesh and agents.
    let mesh = shapes::grid(STRIP_CELLS, 2, 1.0)?;
    println!("Mesh: {} faces", mesh.face_count());
    let mut rng = TraceRng::new(SEED);
    let agents = random_agents(&mesh, &mut rng)?;

    // 2. Graph.
    let config = TracerConfig { check_validity: true, ..TracerConfig::default() };
    let mut graph = MotorcycleGraphBuilder::new(mesh)
        .config(config)
        .agents(agents)
        .build()?;

    // 3. Output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let dir = Path::new(OUTPUT_DIR);
    let writer = TrackCsvWriter::new(dir)?;
    let mut obs = CountingObserver { inner: DumpObserver::new(writer, dir), collisions: 0, crashes: 0 };

    // 4. Trace.
    let t0 = Instant::now();
    graph.trace(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("dump error: {e}");
    }

    // 5. Summary.
    println!("Traced in {:.3} s", elapsed.as_secs_f64());
    println!("  events     : {}", graph.event_count());
    println!("  collisions : {}", obs.collisions);
    println!("  crashes    : {}", obs.crashes);
    println!("  points     : {}", graph.dictionary().point_count());
    println!("  segments   : {}", graph.segments().len());
    println!();

    println!("{:<8} {:<10} {:<26}", "Agent", "Time", "Stopped at");
    println!("{}", "-".repeat(44));
    for mc in graph.motorcycles() {
        let p = graph.dictionary().position(mc.current_position());
        println!(
            "{:<8} {:<10.4} ({:.4}, {:.4})",
            mc.id().0,
            mc.current_time(),
            p.x,
            p.y
        );
    }

    Ok(())
}
