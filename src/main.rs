use std::path::PathBuf;

use clap::Parser;
use rv32_multicycle::config::Config;
use rv32_multicycle::cpu::Machine;

#[derive(Parser, Debug)]
#[command(about = "Cycle-accurate multi-cycle RV32I core")]
struct Args {
    /// Word-per-line firmware image (`@index word`)
    #[arg(long, conflicts_with = "elf", required_unless_present = "elf")]
    hex: Option<PathBuf>,

    /// RV32 ELF to load; its entry point becomes the reset address
    #[arg(long)]
    elf: Option<PathBuf>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Reset address (overrides config)
    #[arg(long, value_parser = parse_u32)]
    reset_addr: Option<u32>,

    /// RAM size in KiB (overrides config)
    #[arg(long)]
    ram_kib: Option<usize>,

    /// Stop after N cycles, 0 = run until halted (overrides config)
    #[arg(long)]
    max_cycles: Option<u64>,

    /// Log every tick and every retired instruction
    #[arg(long, default_value_t = false)]
    trace: bool,

    /// Print the register file when the run ends
    #[arg(long, default_value_t = false)]
    dump_regs: bool,
}

fn parse_u32(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid address {s}: {e}"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_filter = if args.trace { "trace" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(addr) = args.reset_addr {
        config.reset_addr = addr;
    }
    if let Some(kib) = args.ram_kib {
        config.ram_bytes = kib
            .checked_mul(1024)
            .ok_or_else(|| format!("--ram-kib {kib} is too large"))?;
    }
    if let Some(n) = args.max_cycles {
        config.max_cycles = n;
    }

    let mut machine = Machine::new(&config);

    if let Some(path) = &args.hex {
        rv32_multicycle::hex::load_hex_into_memory(path, &mut machine.mem)?;
    } else if let Some(path) = &args.elf {
        let entry = rv32_multicycle::elf::load_elf_into_memory(path, &mut machine.mem)?;
        println!("Loaded ELF entry point at 0x{entry:08x}");
        machine.reset_addr = entry;
        machine.reset();
    }

    let result = machine.run(config.max_cycles);

    if args.dump_regs {
        print!(
            "{}",
            rv32_multicycle::debug::format_regs(&machine.cpu.regs)
        );
    }

    match result {
        Ok(halt) => {
            println!("CPU halted: {halt}");
            println!(
                "cycles={} retired={} pc=0x{:08x}",
                machine.cycles, machine.retired, machine.cpu.pc
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("CPU error: {e}");
            eprintln!("At PC: 0x{:08x}", machine.cpu.pc);
            Err(e.into())
        }
    }
}
