pub mod tabpy;
