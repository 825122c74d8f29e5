//! Configuration types for backdrop effects.
//!
//! Every effect is built from one section of [`BackdropConfig`]. The whole
//! tree serializes to JSON, and every field has a default, so a config file
//! only needs the keys it wants to change:
//!
//! ```
//! use backdrop::config::BackdropConfig;
//!
//! let config = BackdropConfig::from_json(r#"{ "graph": { "node_count": 80 } }"#).unwrap();
//! assert_eq!(config.graph.node_count, 80);
//! assert_eq!(config.depth.count, 100);
//! ```

use crate::Result;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Node graph ("neural network") animation settings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GraphConfig {
    /// Number of nodes.
    pub node_count: usize,
    /// Full width of the initial velocity range, per axis (px/frame).
    pub speed: f32,
    /// Fewest link draws per node.
    pub min_links: usize,
    /// Most link draws per node.
    pub max_links: usize,
    /// Links at or beyond this distance (px) are not drawn.
    pub link_distance: f32,
    /// Alpha of the per-frame fade overlay.
    pub fade: f32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            node_count: 50,
            speed: 0.5,
            min_links: 2,
            max_links: 6,
            link_distance: 200.0,
            fade: 0.05,
        }
    }
}

/// Glyph rain ("matrix") animation settings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RainConfig {
    /// Horizontal spacing of columns (px). One drop per column.
    pub column_width: f32,
    /// Slowest fall speed (px/frame).
    pub min_speed: f32,
    /// Fall speed upper bound, exclusive (px/frame).
    pub max_speed: f32,
    /// Characters a drop can show.
    pub glyphs: String,
    /// Font size (px).
    pub font_px: f32,
    /// Where a drop restarts after leaving the bottom edge (px).
    pub respawn_y: f32,
    /// Spatial frequency of the brightness wave along y.
    pub wave: f32,
    /// Alpha of a drop at full brightness.
    pub max_opacity: f32,
    /// Alpha of the per-frame fade overlay.
    pub fade: f32,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            column_width: 20.0,
            min_speed: 1.0,
            max_speed: 4.0,
            glyphs: "01アイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワヲン"
                .to_owned(),
            font_px: 16.0,
            respawn_y: -20.0,
            wave: 0.01,
            max_opacity: 0.3,
            fade: 0.05,
        }
    }
}

/// Perspective particle field settings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DepthConfig {
    /// Number of motes.
    pub count: usize,
    /// Depth motes start at when recycled, and the upper bound at spawn.
    pub max_depth: f32,
    /// Focal constant of the perspective divide.
    pub focal_length: f32,
    /// Frames a mote lives after recycling.
    pub max_life: u32,
    /// Full width of the lateral velocity range, per axis (px/frame).
    pub lateral_speed: f32,
    /// Slowest approach speed (depth units/frame).
    pub min_approach: f32,
    /// Approach speed upper bound, exclusive (depth units/frame).
    pub max_approach: f32,
    /// Projected radius per unit of perspective scale.
    pub size: f32,
    /// Alpha of the per-frame fade overlay.
    pub fade: f32,
}

impl Default for DepthConfig {
    fn default() -> Self {
        Self {
            count: 100,
            max_depth: 1000.0,
            focal_length: 500.0,
            max_life: 100,
            lateral_speed: 2.0,
            min_approach: 1.0,
            max_approach: 6.0,
            size: 2.0,
            fade: 0.1,
        }
    }
}

/// Mouse trail settings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrailConfig {
    /// Number of trail points.
    pub length: usize,
    /// Fraction of the gap to its predecessor a point closes each frame.
    pub follow: f32,
    /// Size of the faintest point (px).
    pub min_size: f32,
    /// Extra size of the head point over `min_size` (px).
    pub size_range: f32,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            length: 20,
            follow: 0.3,
            min_size: 2.0,
            size_range: 6.0,
        }
    }
}

/// Pointer orbit settings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OrbitConfig {
    /// Number of orbiting particles.
    pub count: usize,
    /// Orbit radius (px).
    pub radius: f32,
    /// Angular speed (radians/second).
    pub angular_speed: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            count: 24,
            radius: 40.0,
            angular_speed: 2.0,
        }
    }
}

/// A timed text reveal.
///
/// With `delete_delay_ms` set, each line is typed, held for `pause_ms`, then
/// deleted character by character. Without it, the line is held and then
/// cleared in one go.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TypewriterConfig {
    pub lines: Vec<String>,
    pub type_delay_ms: u64,
    pub delete_delay_ms: Option<u64>,
    pub pause_ms: u64,
}

impl TypewriterConfig {
    pub fn type_delay(&self) -> Duration {
        Duration::from_millis(self.type_delay_ms)
    }

    pub fn delete_delay(&self) -> Option<Duration> {
        self.delete_delay_ms.map(Duration::from_millis)
    }

    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }

    /// Hero code snippets, typed and deleted.
    pub fn code_snippets() -> Self {
        Self {
            lines: [
                "// Neural Network Implementation\nclass NeuralNetwork {\n  constructor(layers) {\n    this.weights = this.initializeWeights(layers);\n    this.biases = this.initializeBiases(layers);\n  }\n  \n  forward(input) {\n    return this.layers.reduce((output, layer) => \n      this.sigmoid(this.multiply(layer.weights, output))\n    );\n  }\n}",
                "# Quantum Computing Simulation\nimport numpy as np\nfrom qiskit import QuantumCircuit, execute\n\ndef quantum_fourier_transform(n_qubits):\n    qc = QuantumCircuit(n_qubits)\n    for i in range(n_qubits):\n        qc.h(i)\n        for j in range(i+1, n_qubits):\n            qc.cp(np.pi/2**(j-i), j, i)\n    return qc",
                "// Blockchain Smart Contract\npragma solidity ^0.8.0;\n\ncontract AdvancedDeFi {\n    mapping(address => uint256) private balances;\n    mapping(address => mapping(address => uint256)) private allowances;\n    \n    function stake(uint256 amount) external {\n        require(balances[msg.sender] >= amount);\n        stakingPool += amount;\n        emit Staked(msg.sender, amount);\n    }\n}",
                "// WebAssembly Performance Module\n(module\n  (func $fibonacci (param $n i32) (result i32)\n    (if (result i32)\n      (i32.lt_s (local.get $n) (i32.const 2))\n      (then (local.get $n))\n      (else\n        (i32.add\n          (call $fibonacci (i32.sub (local.get $n) (i32.const 1)))\n          (call $fibonacci (i32.sub (local.get $n) (i32.const 2)))\n        )\n      )\n    )\n  )\n)",
            ]
            .map(str::to_owned)
            .to_vec(),
            type_delay_ms: 50,
            delete_delay_ms: Some(25),
            pause_ms: 2000,
        }
    }

    /// Rotating one-line quotes under the hero text.
    pub fn quotes() -> Self {
        Self {
            lines: [
                "The future is quantum. The present is neural.",
                "Machines learn, humans imagine.",
                "Blockchain: Trust in code.",
                "WebAssembly: Speed of thought.",
                "AI: The new electricity.",
                "In 2080, engineers are algorithms.",
            ]
            .map(str::to_owned)
            .to_vec(),
            type_delay_ms: 40,
            delete_delay_ms: None,
            pause_ms: 3000,
        }
    }

    /// The live code panel.
    pub fn live_code() -> Self {
        Self {
            lines: [
                "// Quantum Neural Network\nclass QuantumNet {\n  constructor(qubits) {\n    this.qubits = qubits;\n  }\n  superpose() {\n    // Apply quantum superposition\n  }\n  entangle() {\n    // Entangle qubits\n  }\n}",
                "// Blockchain Smart Contract\ncontract AIEngineer {\n  function deploy() public {\n    // Deploy contract to chain\n  }\n}",
                "// WebAssembly ML Inference\nimport { runModel } from 'wasm-ml';\nrunModel('neural.onnx', inputData);",
            ]
            .map(str::to_owned)
            .to_vec(),
            type_delay_ms: 30,
            delete_delay_ms: None,
            pause_ms: 2000,
        }
    }
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self::code_snippets()
    }
}

/// A typewriter section as written in a config file.
///
/// Keys left out keep the value from the section's own preset, so a partial
/// `quotes` section stays a quote rotator.
#[derive(Deserialize)]
struct TypewriterSection {
    lines: Option<Vec<String>>,
    type_delay_ms: Option<u64>,
    #[serde(default, deserialize_with = "present")]
    delete_delay_ms: Option<Option<u64>>,
    pause_ms: Option<u64>,
}

/// Distinguish an explicit `null` (`Some(None)`) from a missing key (`None`).
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl TypewriterSection {
    fn over(self, preset: TypewriterConfig) -> TypewriterConfig {
        TypewriterConfig {
            lines: self.lines.unwrap_or(preset.lines),
            type_delay_ms: self.type_delay_ms.unwrap_or(preset.type_delay_ms),
            delete_delay_ms: self.delete_delay_ms.unwrap_or(preset.delete_delay_ms),
            pause_ms: self.pause_ms.unwrap_or(preset.pause_ms),
        }
    }
}

fn code_typing_section<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<TypewriterConfig, D::Error> {
    Ok(TypewriterSection::deserialize(d)?.over(TypewriterConfig::code_snippets()))
}

fn quotes_section<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<TypewriterConfig, D::Error> {
    Ok(TypewriterSection::deserialize(d)?.over(TypewriterConfig::quotes()))
}

fn live_code_section<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<TypewriterConfig, D::Error> {
    Ok(TypewriterSection::deserialize(d)?.over(TypewriterConfig::live_code()))
}

/// Settings for every effect on the page.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackdropConfig {
    pub graph: GraphConfig,
    pub rain: RainConfig,
    pub depth: DepthConfig,
    pub trail: TrailConfig,
    pub orbit: OrbitConfig,
    #[serde(deserialize_with = "code_typing_section")]
    pub code_typing: TypewriterConfig,
    #[serde(deserialize_with = "quotes_section")]
    pub quotes: TypewriterConfig,
    #[serde(deserialize_with = "live_code_section")]
    pub live_code: TypewriterConfig,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            graph: GraphConfig::default(),
            rain: RainConfig::default(),
            depth: DepthConfig::default(),
            trail: TrailConfig::default(),
            orbit: OrbitConfig::default(),
            code_typing: TypewriterConfig::code_snippets(),
            quotes: TypewriterConfig::quotes(),
            live_code: TypewriterConfig::live_code(),
        }
    }
}

impl BackdropConfig {
    /// Parse a config from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the config as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Write the config to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
