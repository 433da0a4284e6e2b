use crate::state::{HazardGrid, KinematicState, TerrainGrid};

// ANSI color codes
const RESET: &str = "\x1b[0m";
const AGENT: &str = "\x1b[1;33m"; // Bright yellow
const SOLID: &str = "\x1b[90m"; // Dark gray
const HAZARD: &str = "\x1b[1;31m"; // Bright red

/// Render terrain, hazards and the agent, one text line per tile row.
///
/// Without color: `@` agent, `#` solid, `E` hazard, `.` empty.
pub fn draw_frame(
    terrain: &TerrainGrid,
    hazards: &HazardGrid,
    agent: Option<&KinematicState>,
    color: bool,
) -> String {
    let mut output = String::with_capacity((terrain.cols() + 1) * terrain.rows());

    for row in 0..terrain.rows() as i32 {
        for col in 0..terrain.cols() as i32 {
            let is_agent = agent.is_some_and(|a| a.row == row && a.col == col);
            let (glyph, fancy, paint) = if is_agent {
                ('@', '@', AGENT)
            } else if hazards.has_hazard(row, col) {
                ('E', 'E', HAZARD)
            } else if terrain.is_solid(row, col) {
                ('#', '█', SOLID)
            } else {
                ('.', ' ', "")
            };

            if !color {
                output.push(glyph);
            } else if paint.is_empty() {
                output.push(fancy);
            } else {
                output.push_str(paint);
                output.push(fancy);
                output.push_str(RESET);
            }
        }
        output.push('\n');
    }

    output
}
