use crate::constants::opcodes::*;
use crate::instructions::{Instructions, Mnemonic};

/// Map an opcode word to its mnemonic; unassigned codes decode to NOP
pub fn mnemonic(word: i32) -> Mnemonic {
    match word {
        OP_CONST => Mnemonic::CONST,
        OP_CALL => Mnemonic::CALL,
        OP_JUMP => Mnemonic::JUMP,
        OP_JUMPZ => Mnemonic::JUMPZ,
        OP_JUMPIF => Mnemonic::JUMPIF,
        OP_LOAD => Mnemonic::LOAD,
        OP_STOR => Mnemonic::STOR,
        OP_RETURN => Mnemonic::RETURN,
        OP_DROP => Mnemonic::DROP,
        OP_SWAP => Mnemonic::SWAP,
        OP_DUP => Mnemonic::DUP,
        OP_OVER => Mnemonic::OVER,
        OP_STR => Mnemonic::STR,
        OP_RTS => Mnemonic::RTS,
        OP_ADD => Mnemonic::ADD,
        OP_SUB => Mnemonic::SUB,
        OP_MUL => Mnemonic::MUL,
        OP_DIV => Mnemonic::DIV,
        OP_MOD => Mnemonic::MOD,
        OP_AND => Mnemonic::AND,
        OP_OR => Mnemonic::OR,
        OP_XOR => Mnemonic::XOR,
        OP_NOT => Mnemonic::NOT,
        OP_SGT => Mnemonic::SGT,
        OP_SLT => Mnemonic::SLT,
        OP_SYNC => Mnemonic::SYNC,
        OP_NEXT => Mnemonic::NEXT,
        _ => Mnemonic::NOP,
    }
}

/// Decode the instruction whose opcode sits at `pc`
/// `operand` is the address of the cell following the opcode
pub fn decoder(pc: i32, word: i32) -> Instructions {
    Instructions {
        pc,
        data: word,
        mnem: mnemonic(word),
        operand: pc.wrapping_add(1),
    }
}

#[cfg(test)]
mod decoder_tests {
    use super::*;

    #[test]
    fn test_operand_instructions() {
        assert!(decoder(0, OP_CONST).has_operand());
        assert!(decoder(0, OP_CALL).has_operand());
        assert!(decoder(0, OP_NEXT).has_operand());
        assert!(!decoder(0, OP_ADD).has_operand());
        assert!(!decoder(0, OP_SYNC).has_operand());
    }

    #[test]
    fn test_unassigned_codes_are_nops() {
        for word in [5, 6, 7, 8, 9, 32, -1, 1000] {
            assert!(matches!(mnemonic(word), Mnemonic::NOP));
        }
    }

    #[test]
    fn test_operand_follows_opcode() {
        let i = decoder(40, OP_JUMP);
        assert_eq!(i.operand, 41);
        assert!(matches!(i.mnem, Mnemonic::JUMP));
    }
}
