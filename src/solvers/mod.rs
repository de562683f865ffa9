pub mod euler2d_hllc;
