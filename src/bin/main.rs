//! Armor Stand Rig CLI
//!
//! Pose a Minecraft armor stand and export it as a 3D mesh.

use armor_stand_rig::{
    box_uvs, export_glb, load_frames, ArmorStand, Joint, ObjExport, Pose, RigConfig, RigOutput,
    SceneGraph, TextureSource, TextureStatus,
};
use armor_stand_rig::rig::PART_DEFS;
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "armor-stand-rig")]
#[command(author, version, about = "Pose a Minecraft armor stand and export it as a mesh", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the stand in a single pose
    Pose {
        /// JSON file with one frame (head, left_arm, right_arm, left_leg, right_leg)
        #[arg(long)]
        frame: Option<PathBuf>,

        #[command(flatten)]
        setup: Setup,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "glb")]
        format: OutputFormat,
    },

    /// Export every frame of a JSON array of frames
    Frames {
        /// Input JSON file containing an array of frames
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        setup: Setup,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "glb")]
        format: OutputFormat,
    },

    /// Print the atlas UV attribute of a posable part
    Uv {
        /// Part name (head, left_arm, right_arm, left_leg, right_leg)
        #[arg(short, long)]
        part: String,
    },
}

#[derive(clap::Args)]
struct Setup {
    /// Texture file path or http(s) URL (defaults to the configured URL)
    #[arg(short, long)]
    texture: Option<String>,

    /// JSON rig configuration
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Binary glTF format
    Glb,
    /// Wavefront OBJ format
    Obj,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Glb => "glb",
            OutputFormat::Obj => "obj",
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().without_time().compact().init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Pose {
            frame,
            setup,
            output,
            format,
        } => {
            let pose = match frame {
                Some(path) => Pose::from_json_str(&fs::read_to_string(path)?)?,
                None => Pose::default(),
            };
            export_poses(&[pose], &setup, &output, format, false)?;
        }
        Commands::Frames {
            input,
            setup,
            output,
            format,
        } => {
            println!("Loading frames from {:?}...", input);
            let frames = load_frames(&fs::read_to_string(&input)?)?;
            println!("  Loaded {} frames", frames.len());

            fs::create_dir_all(&output)?;
            export_poses(&frames, &setup, &output, format, true)?;
        }
        Commands::Uv { part } => {
            print_uvs(&part)?;
        }
    }

    Ok(())
}

fn build_stand(setup: &Setup) -> Result<ArmorStand, Box<dyn std::error::Error>> {
    let config = match &setup.config {
        Some(path) => RigConfig::from_path(path)?,
        None => RigConfig::default(),
    };

    let mut stand = match &setup.texture {
        Some(texture) => ArmorStand::with_texture(config, texture_source(texture)),
        None => ArmorStand::new(config),
    };

    println!("Loading texture...");
    match stand.wait_for_texture() {
        TextureStatus::Ready => println!(
            "  Texture: {}x{}",
            stand.texture().width,
            stand.texture().height
        ),
        _ => println!("  Texture unavailable, using solid fallback"),
    }

    Ok(stand)
}

fn texture_source(texture: &str) -> TextureSource {
    if texture.starts_with("http://") || texture.starts_with("https://") {
        TextureSource::Url(texture.to_string())
    } else {
        TextureSource::Path(PathBuf::from(texture))
    }
}

fn export_poses(
    poses: &[Pose],
    setup: &Setup,
    output_path: &Path,
    format: OutputFormat,
    numbered: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut stand = build_stand(setup)?;
    let mut scene = SceneGraph::new();
    stand.mount(&mut scene)?;

    for (i, pose) in poses.iter().enumerate() {
        stand.update(&mut scene, pose);
        let output = stand.output(&scene)?;

        println!(
            "Frame {}: {} vertices, {} triangles",
            i,
            output.total_vertices(),
            output.total_triangles()
        );

        let path = if numbered {
            output_path.join(format!("frame_{:04}.{}", i, format.extension()))
        } else {
            output_path.with_extension(format.extension())
        };
        export_output(&output, &path, format)?;
    }

    Ok(())
}

fn print_uvs(part: &str) -> Result<(), Box<dyn std::error::Error>> {
    let joint: Joint = part.parse()?;
    let def = &PART_DEFS[joint as usize];

    println!(
        "{} ({}x{}x{} at {},{}):",
        joint,
        def.spec.width,
        def.spec.height,
        def.spec.depth,
        def.spec.u_offset,
        def.spec.v_offset
    );
    let uvs = box_uvs(&def.spec, 24);
    for (i, uv) in uvs.chunks_exact(2).enumerate() {
        println!("  {:2}: {:.6} {:.6}", i, uv[0], uv[1]);
    }

    Ok(())
}

fn export_output(
    output: &RigOutput,
    path: &Path,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Glb => {
            let glb_data = export_glb(output)?;
            fs::write(path, &glb_data)?;
            println!("Exported GLB ({} bytes) to {:?}", glb_data.len(), path);
        }
        OutputFormat::Obj => {
            // The OBJ references its MTL and texture by file stem
            let name = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("armor_stand");
            let obj_export = ObjExport::from_output(output, name)?;

            let obj_path = path.to_path_buf();
            let mtl_path = obj_path.with_extension("mtl");
            let png_path = obj_path.with_file_name(&obj_export.texture_filename);

            fs::write(&obj_path, &obj_export.obj)?;
            fs::write(&mtl_path, &obj_export.mtl)?;
            fs::write(&png_path, &obj_export.texture_png)?;

            println!("Exported OBJ to {:?}", obj_path);
            println!("  Material: {:?}", mtl_path);
            println!("  Texture: {:?}", png_path);
        }
    }

    Ok(())
}
