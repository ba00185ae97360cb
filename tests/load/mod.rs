mod constant_vus_test;
