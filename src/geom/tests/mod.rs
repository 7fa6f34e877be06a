mod test_cage_basic;
mod test_ray_basic;
