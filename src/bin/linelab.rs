fn main() {
    pollster::block_on(linelab::run());
}
