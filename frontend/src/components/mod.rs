pub mod multi_step;
