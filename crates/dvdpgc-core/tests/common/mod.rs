//! Synthetic VTS IFO images for integration tests.

const SECTOR_POINTER: usize = 0xCC;
const BLOCK: usize = 0x800;
const CHAIN_HEADER_LEN: usize = 0xEC;
const CELL_RECORD_LEN: usize = 0x18;

#[derive(Clone)]
pub struct CellSpec {
    pub category: u8,
    pub time: [u8; 4],
}

impl CellSpec {
    /// Normal cell lasting `seconds` at 25 fps.
    pub fn pal(seconds: u8) -> Self {
        Self {
            category: 0,
            time: [0x00, 0x00, bcd(seconds), 0x40],
        }
    }
}

#[derive(Clone)]
pub struct ChainSpec {
    pub duration: [u8; 4],
    /// Entry cell of each program, 1-based.
    pub program_map: Vec<u8>,
    pub cells: Vec<CellSpec>,
}

impl ChainSpec {
    /// One program per cell.
    pub fn one_cell_per_program(cells: Vec<CellSpec>) -> Self {
        let program_map = (1..=cells.len() as u8).collect();
        Self {
            duration: [0x00, 0x00, 0x00, 0x40],
            program_map,
            cells,
        }
    }
}

pub fn bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

/// Build an IFO image with the PGCI table at `sector`.
///
/// Chain bodies are laid out in reverse directory order so a decoder that
/// walks chain bodies sequentially instead of following the directory
/// produces the wrong order.
pub fn build_ifo(sector: u32, chains: &[ChainSpec]) -> Vec<u8> {
    let base = sector as usize * BLOCK;
    let directory_len = 8 + 8 * chains.len();

    let bodies: Vec<Vec<u8>> = chains.iter().map(build_chain).collect();
    let mut offsets = vec![0usize; chains.len()];
    let mut next = align(directory_len);
    for (index, body) in bodies.iter().enumerate().rev() {
        offsets[index] = next;
        next = align(next + body.len());
    }

    let mut ifo = vec![0u8; base + next];
    ifo[SECTOR_POINTER..SECTOR_POINTER + 4].copy_from_slice(&sector.to_be_bytes());
    ifo[base..base + 2].copy_from_slice(&(chains.len() as u16).to_be_bytes());
    ifo[base + 4..base + 8].copy_from_slice(&((next - 1) as u32).to_be_bytes());
    for (index, body) in bodies.iter().enumerate() {
        let entry = base + 8 * (index + 1);
        ifo[entry] = 0x80 | (index as u8 + 1);
        ifo[entry + 4..entry + 8].copy_from_slice(&(offsets[index] as u32).to_be_bytes());
        let start = base + offsets[index];
        ifo[start..start + body.len()].copy_from_slice(body);
    }
    ifo
}

fn build_chain(chain: &ChainSpec) -> Vec<u8> {
    let program_map = CHAIN_HEADER_LEN;
    let cell_table = align(program_map + chain.program_map.len());
    let mut body = vec![0u8; cell_table + chain.cells.len() * CELL_RECORD_LEN];

    body[2] = chain.program_map.len() as u8;
    body[3] = chain.cells.len() as u8;
    body[4..8].copy_from_slice(&chain.duration);
    body[0xE6..0xE8].copy_from_slice(&(program_map as u16).to_be_bytes());
    body[0xE8..0xEA].copy_from_slice(&(cell_table as u16).to_be_bytes());
    body[program_map..program_map + chain.program_map.len()].copy_from_slice(&chain.program_map);
    for (index, cell) in chain.cells.iter().enumerate() {
        let record = cell_table + index * CELL_RECORD_LEN;
        body[record] = cell.category << 6;
        body[record + 4..record + 8].copy_from_slice(&cell.time);
    }
    body
}

fn align(value: usize) -> usize {
    (value + 3) & !3
}
