use fuzz_omegare::Input;

fn main() {
    afl::fuzz!(|data: Input| data.run_convert());
}
