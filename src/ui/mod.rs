mod ascii;

pub use ascii::draw_frame;
